//! Stack virtual machine for compiled [`Module`]s.
//!
//! Each user call gets a [`Frame`] with its own program counter and local
//! scopes; operands live on one shared stack. Standard functions run
//! natively and write to the output the VM was created with.

mod frame;
mod value;

pub use value::Value;

use std::io::{self, Write};

use thiserror::Error;
use tracing::{debug, trace};

use crate::bytecode::{DecodeError, Decoder, Instruction, Module};
use crate::stdlib::StandardFunction;

use frame::{Frame, Locals};

/// Maximum number of simultaneously active user calls.
pub const MAX_CALL_DEPTH: usize = 1024;

#[derive(Debug, Error)]
pub enum VmError {
    #[error("module has no 'main' function")]
    MissingMain,
    #[error("unknown function '{0}'")]
    UnknownFunction(String),
    #[error("undefined local '{0}'")]
    UndefinedLocal(String),
    #[error("{instruction} expected {expected}, found {found}")]
    OperandType {
        instruction: &'static str,
        expected: &'static str,
        found: &'static str,
    },
    #[error("function '{name}' expects {expected} arguments, got {found}")]
    Arity {
        name: String,
        expected: usize,
        found: usize,
    },
    #[error("operand stack underflow")]
    StackUnderflow,
    #[error("LEAVE_SCOPE without a matching ENTER_SCOPE")]
    ScopeUnderflow,
    #[error("maximum call depth of {} exceeded", MAX_CALL_DEPTH)]
    CallDepthExceeded,
    #[error("integer overflow in {0}")]
    Overflow(&'static str),
    #[error(transparent)]
    Decode(#[from] DecodeError),
    #[error("failed to write output: {0}")]
    Io(#[from] io::Error),
}

pub struct Vm<'m, W> {
    module: &'m Module,
    out: W,
    stack: Vec<Value>,
    frames: Vec<Frame<'m>>,
}

impl<'m, W: Write> Vm<'m, W> {
    pub fn new(module: &'m Module, out: W) -> Self {
        Vm {
            module,
            out,
            stack: Vec::new(),
            frames: Vec::new(),
        }
    }

    /// Run `main` to completion and return its value.
    pub fn run(&mut self) -> Result<Value, VmError> {
        let module = self.module;
        let main = module.function("main").ok_or(VmError::MissingMain)?;
        if !main.params.is_empty() {
            return Err(VmError::Arity {
                name: main.name.clone(),
                expected: main.params.len(),
                found: 0,
            });
        }

        self.stack.clear();
        self.frames.clear();
        self.frames.push(Frame {
            function: main,
            pc: 0,
            stack_base: 0,
            locals: Locals::new([]),
        });

        loop {
            if let Some(value) = self.step()? {
                self.out.flush()?;
                return Ok(value);
            }
        }
    }

    pub fn into_output(self) -> W {
        self.out
    }

    /// Execute one instruction; yields `main`'s return value once it returns.
    fn step(&mut self) -> Result<Option<Value>, VmError> {
        let inst = {
            let frame = self.frame()?;
            let mut dec = Decoder::at(&frame.function.code, frame.pc);
            let inst = Instruction::decode(&mut dec)?;
            let next = dec.position();
            self.frame_mut()?.pc = next;
            inst
        };
        trace!(%inst, depth = self.frames.len(), "execute");

        match inst {
            Instruction::Ret => {
                let value = self.pop()?;
                let frame = self.frames.pop().ok_or(VmError::StackUnderflow)?;
                self.stack.truncate(frame.stack_base);
                if self.frames.is_empty() {
                    return Ok(Some(value));
                }
                self.stack.push(value);
            }
            Instruction::Call(name) => self.call(&name)?,
            Instruction::PushInt(v) => self.stack.push(Value::Int(v)),
            Instruction::PushString(s) => self.stack.push(Value::Str(s)),
            Instruction::PushBool(b) => self.stack.push(Value::Bool(b)),
            Instruction::PushUnit => self.stack.push(Value::Unit),
            Instruction::Pop => {
                self.pop()?;
            }
            Instruction::Let(name) => {
                let value = self.pop()?;
                self.frame_mut()?.locals.add(name, value);
            }
            Instruction::Load(name) => {
                let value = self
                    .frame()?
                    .locals
                    .resolve(&name)
                    .cloned()
                    .ok_or(VmError::UndefinedLocal(name))?;
                self.stack.push(value);
            }
            Instruction::Add => {
                let (left, right) = self.pop_int_pair("ADD")?;
                let sum = left.checked_add(right).ok_or(VmError::Overflow("ADD"))?;
                self.stack.push(Value::Int(sum));
            }
            Instruction::Sub => {
                let (left, right) = self.pop_int_pair("SUB")?;
                let diff = left.checked_sub(right).ok_or(VmError::Overflow("SUB"))?;
                self.stack.push(Value::Int(diff));
            }
            Instruction::Neg => {
                let operand = self.pop_int("NEG")?;
                let negated = operand.checked_neg().ok_or(VmError::Overflow("NEG"))?;
                self.stack.push(Value::Int(negated));
            }
            Instruction::JumpIfFalse(target) => {
                let jump = match self.pop()? {
                    Value::Bool(b) => !b,
                    Value::Int(n) => n == 0,
                    other => {
                        return Err(VmError::OperandType {
                            instruction: "JUMP_IF_FALSE",
                            expected: "bool",
                            found: other.type_name(),
                        });
                    }
                };
                if jump {
                    self.frame_mut()?.pc = target as usize;
                }
            }
            Instruction::EnterScope => self.frame_mut()?.locals.enter(),
            Instruction::LeaveScope => {
                if !self.frame_mut()?.locals.leave() {
                    return Err(VmError::ScopeUnderflow);
                }
            }
        }

        Ok(None)
    }

    fn call(&mut self, name: &str) -> Result<(), VmError> {
        let module = self.module;
        if let Some(function) = module.function(name) {
            if self.frames.len() >= MAX_CALL_DEPTH {
                return Err(VmError::CallDepthExceeded);
            }

            let args = self.pop_args(function.params.len())?;
            debug!(function = name, depth = self.frames.len() + 1, "call");

            self.frames.push(Frame {
                function,
                pc: 0,
                stack_base: self.stack.len(),
                locals: Locals::new(function.params.iter().cloned().zip(args)),
            });
            return Ok(());
        }

        let Some(builtin) = StandardFunction::from_name(name) else {
            return Err(VmError::UnknownFunction(name.to_string()));
        };
        let args = self.pop_args(builtin.arguments().len())?;
        debug!(function = name, "call built-in");

        let result = self.call_builtin(builtin, args)?;
        self.stack.push(result);
        Ok(())
    }

    fn call_builtin(
        &mut self,
        builtin: StandardFunction,
        args: Vec<Value>,
    ) -> Result<Value, VmError> {
        let instruction = "CALL";
        let mismatch = |expected: &'static str, found: &Value| VmError::OperandType {
            instruction,
            expected,
            found: found.type_name(),
        };

        match (builtin, args.as_slice()) {
            (StandardFunction::Echo, [Value::Str(s)]) => {
                write!(self.out, "{s}")?;
                Ok(Value::Unit)
            }
            (StandardFunction::EchoInt, [Value::Int(n)]) => {
                write!(self.out, "{n}")?;
                Ok(Value::Unit)
            }
            (StandardFunction::ToString, [Value::Int(n)]) => Ok(Value::Str(n.to_string())),
            (StandardFunction::Concat, [Value::Str(a), Value::Str(b)]) => {
                Ok(Value::Str(format!("{a}{b}")))
            }
            (StandardFunction::Echo | StandardFunction::Concat, [other, ..])
                if !matches!(other, Value::Str(_)) =>
            {
                Err(mismatch("string", other))
            }
            (StandardFunction::Concat, [_, other]) => Err(mismatch("string", other)),
            (_, [other, ..]) => Err(mismatch("int", other)),
            (_, []) => Err(VmError::StackUnderflow),
        }
    }

    fn frame(&self) -> Result<&Frame<'m>, VmError> {
        self.frames.last().ok_or(VmError::StackUnderflow)
    }

    fn frame_mut(&mut self) -> Result<&mut Frame<'m>, VmError> {
        self.frames.last_mut().ok_or(VmError::StackUnderflow)
    }

    fn pop(&mut self) -> Result<Value, VmError> {
        let base = self.frame()?.stack_base;
        if self.stack.len() <= base {
            return Err(VmError::StackUnderflow);
        }
        self.stack.pop().ok_or(VmError::StackUnderflow)
    }

    /// Pop `count` values, returned in push order.
    fn pop_args(&mut self, count: usize) -> Result<Vec<Value>, VmError> {
        let base = self.frame()?.stack_base;
        if self.stack.len() < base + count {
            return Err(VmError::StackUnderflow);
        }
        Ok(self.stack.split_off(self.stack.len() - count))
    }

    fn pop_int(&mut self, instruction: &'static str) -> Result<i64, VmError> {
        match self.pop()? {
            Value::Int(n) => Ok(n),
            other => Err(VmError::OperandType {
                instruction,
                expected: "int",
                found: other.type_name(),
            }),
        }
    }

    fn pop_int_pair(&mut self, instruction: &'static str) -> Result<(i64, i64), VmError> {
        let right = self.pop_int(instruction)?;
        let left = self.pop_int(instruction)?;
        Ok((left, right))
    }
}

/// Run a module's `main`, writing standard output to `out`.
pub fn run(module: &Module, out: impl Write) -> Result<Value, VmError> {
    Vm::new(module, out).run()
}
