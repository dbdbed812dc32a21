//! Stack bytecode: instruction set, module file format and the compiler that
//! produces it.

mod codec;
mod compiler;
mod instruction;
mod module;

pub use codec::{DecodeError, Decoder, Encoder};
pub use compiler::{CompileError, compile};
pub use instruction::{Instruction, Opcode, decode_all, disassemble};
pub use module::{CompiledFunction, MAGIC, Module, VERSION};
