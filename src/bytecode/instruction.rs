use std::fmt;

use super::codec::{DecodeError, Decoder, Encoder};

/// Instruction tags, written as little-endian `u16`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u16)]
pub enum Opcode {
    Ret = 0,
    Call = 1,
    PushInt = 2,
    Pop = 3,
    Let = 4,
    PushString = 5,
    Load = 6,
    PushUnit = 7,
    Sub = 8,
    Add = 9,
    Neg = 10,
    PushBool = 11,
    JumpIfFalse = 12,
    EnterScope = 13,
    LeaveScope = 14,
}

impl Opcode {
    pub fn from_u16(tag: u16) -> Option<Opcode> {
        let op = match tag {
            0 => Opcode::Ret,
            1 => Opcode::Call,
            2 => Opcode::PushInt,
            3 => Opcode::Pop,
            4 => Opcode::Let,
            5 => Opcode::PushString,
            6 => Opcode::Load,
            7 => Opcode::PushUnit,
            8 => Opcode::Sub,
            9 => Opcode::Add,
            10 => Opcode::Neg,
            11 => Opcode::PushBool,
            12 => Opcode::JumpIfFalse,
            13 => Opcode::EnterScope,
            14 => Opcode::LeaveScope,
            _ => return None,
        };
        Some(op)
    }

    pub fn mnemonic(self) -> &'static str {
        match self {
            Opcode::Ret => "RET",
            Opcode::Call => "CALL",
            Opcode::PushInt => "PUSH_INT",
            Opcode::Pop => "POP",
            Opcode::Let => "LET",
            Opcode::PushString => "PUSH_STRING",
            Opcode::Load => "LOAD",
            Opcode::PushUnit => "PUSH_UNIT",
            Opcode::Sub => "SUB",
            Opcode::Add => "ADD",
            Opcode::Neg => "NEG",
            Opcode::PushBool => "PUSH_BOOL",
            Opcode::JumpIfFalse => "JUMP_IF_FALSE",
            Opcode::EnterScope => "ENTER_SCOPE",
            Opcode::LeaveScope => "LEAVE_SCOPE",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Instruction {
    Ret,
    Call(String),
    PushInt(i64),
    Pop,
    Let(String),
    PushString(String),
    Load(String),
    PushUnit,
    Sub,
    Add,
    Neg,
    PushBool(bool),
    /// Absolute byte offset within the function's code.
    JumpIfFalse(u64),
    EnterScope,
    LeaveScope,
}

impl Instruction {
    pub fn opcode(&self) -> Opcode {
        match self {
            Instruction::Ret => Opcode::Ret,
            Instruction::Call(_) => Opcode::Call,
            Instruction::PushInt(_) => Opcode::PushInt,
            Instruction::Pop => Opcode::Pop,
            Instruction::Let(_) => Opcode::Let,
            Instruction::PushString(_) => Opcode::PushString,
            Instruction::Load(_) => Opcode::Load,
            Instruction::PushUnit => Opcode::PushUnit,
            Instruction::Sub => Opcode::Sub,
            Instruction::Add => Opcode::Add,
            Instruction::Neg => Opcode::Neg,
            Instruction::PushBool(_) => Opcode::PushBool,
            Instruction::JumpIfFalse(_) => Opcode::JumpIfFalse,
            Instruction::EnterScope => Opcode::EnterScope,
            Instruction::LeaveScope => Opcode::LeaveScope,
        }
    }

    pub fn encode(&self, enc: &mut Encoder) {
        enc.write_u16(self.opcode() as u16);
        match self {
            Instruction::Call(name)
            | Instruction::Let(name)
            | Instruction::Load(name)
            | Instruction::PushString(name) => enc.write_string(name),
            Instruction::PushInt(v) => enc.write_i64(*v),
            Instruction::PushBool(v) => enc.write_bool(*v),
            Instruction::JumpIfFalse(target) => enc.write_u64(*target),
            Instruction::Ret
            | Instruction::Pop
            | Instruction::PushUnit
            | Instruction::Sub
            | Instruction::Add
            | Instruction::Neg
            | Instruction::EnterScope
            | Instruction::LeaveScope => {}
        }
    }

    pub fn decode(dec: &mut Decoder) -> Result<Instruction, DecodeError> {
        let start = dec.position();
        let tag = dec.read_u16()?;
        let Some(opcode) = Opcode::from_u16(tag) else {
            return Err(DecodeError {
                message: format!("unknown opcode {tag}"),
                offset: start,
            });
        };

        let inst = match opcode {
            Opcode::Ret => Instruction::Ret,
            Opcode::Call => Instruction::Call(dec.read_string()?),
            Opcode::PushInt => Instruction::PushInt(dec.read_i64()?),
            Opcode::Pop => Instruction::Pop,
            Opcode::Let => Instruction::Let(dec.read_string()?),
            Opcode::PushString => Instruction::PushString(dec.read_string()?),
            Opcode::Load => Instruction::Load(dec.read_string()?),
            Opcode::PushUnit => Instruction::PushUnit,
            Opcode::Sub => Instruction::Sub,
            Opcode::Add => Instruction::Add,
            Opcode::Neg => Instruction::Neg,
            Opcode::PushBool => Instruction::PushBool(dec.read_bool()?),
            Opcode::JumpIfFalse => Instruction::JumpIfFalse(dec.read_u64()?),
            Opcode::EnterScope => Instruction::EnterScope,
            Opcode::LeaveScope => Instruction::LeaveScope,
        };
        Ok(inst)
    }
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let mnemonic = self.opcode().mnemonic();
        match self {
            Instruction::Call(name) | Instruction::Let(name) | Instruction::Load(name) => {
                write!(f, "{mnemonic} {name}")
            }
            Instruction::PushString(s) => write!(f, "{mnemonic} {s:?}"),
            Instruction::PushInt(v) => write!(f, "{mnemonic} {v}"),
            Instruction::PushBool(v) => write!(f, "{mnemonic} {v}"),
            Instruction::JumpIfFalse(target) => write!(f, "{mnemonic} @{target}"),
            _ => write!(f, "{mnemonic}"),
        }
    }
}

/// Decode a whole code buffer into `(offset, instruction)` pairs.
pub fn decode_all(code: &[u8]) -> Result<Vec<(usize, Instruction)>, DecodeError> {
    let mut dec = Decoder::new(code);
    let mut out = Vec::new();
    while dec.remaining() > 0 {
        let offset = dec.position();
        out.push((offset, Instruction::decode(&mut dec)?));
    }
    Ok(out)
}

/// Render code one instruction per line, prefixed with its byte offset.
pub fn disassemble(code: &[u8]) -> Result<String, DecodeError> {
    let lines: Vec<_> = decode_all(code)?
        .into_iter()
        .map(|(offset, inst)| format!("{offset:04}  {inst}"))
        .collect();
    Ok(lines.join("\n"))
}
