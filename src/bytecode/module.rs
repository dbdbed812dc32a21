//! The compiled module file.
//!
//! ```text
//! magic      "QUILLBC\0"
//! version    u16
//! count      u64
//! function*  name, u64 argc, argc * name, u64 code length, code
//! ```
//!
//! Strings are a `u64` byte length followed by UTF-8 bytes. All integers are
//! little-endian.

use super::codec::{DecodeError, Decoder, Encoder};

pub const MAGIC: &[u8; 8] = b"QUILLBC\0";
pub const VERSION: u16 = 1;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompiledFunction {
    pub name: String,
    pub params: Vec<String>,
    pub code: Vec<u8>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Module {
    pub functions: Vec<CompiledFunction>,
}

impl Module {
    pub fn function(&self, name: &str) -> Option<&CompiledFunction> {
        self.functions.iter().find(|f| f.name == name)
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        let mut enc = Encoder::new();
        enc.write_bytes(MAGIC);
        enc.write_u16(VERSION);
        enc.write_len(self.functions.len());
        for function in &self.functions {
            enc.write_string(&function.name);
            enc.write_len(function.params.len());
            for param in &function.params {
                enc.write_string(param);
            }
            enc.write_len(function.code.len());
            enc.write_bytes(&function.code);
        }
        enc.finish()
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Module, DecodeError> {
        let mut dec = Decoder::new(bytes);
        dec.expect_bytes(MAGIC)?;
        let version = dec.read_u16()?;
        if version != VERSION {
            return Err(dec.err(format!(
                "unsupported module version {version} (expected {VERSION})"
            )));
        }

        let count = dec.read_len()?;
        let mut functions = Vec::new();
        for _ in 0..count {
            let name = dec.read_string()?;
            let argc = dec.read_len()?;
            let params = (0..argc)
                .map(|_| dec.read_string())
                .collect::<Result<Vec<_>, _>>()?;
            let len = dec.read_len()?;
            let code = dec.read_exact(len)?.to_vec();
            functions.push(CompiledFunction { name, params, code });
        }

        if dec.remaining() != 0 {
            return Err(dec.err("trailing bytes"));
        }
        Ok(Module { functions })
    }
}
