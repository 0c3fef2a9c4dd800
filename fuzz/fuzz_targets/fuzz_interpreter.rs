#![no_main]

use avm::Avm;
use avm::bytecode::{ActionCode, ByteStream, is_long_opcode};
use libfuzzer_sys::fuzz_target;

/// Backward branches can loop forever; walk the stream and reject them
fn has_backward_branch(data: &[u8]) -> bool {
    let mut stream = ByteStream::new(data);
    while let Ok(opcode) = stream.read_u8() {
        if !is_long_opcode(opcode) {
            continue;
        }
        let Ok(length) = stream.read_u16() else {
            return false;
        };
        let is_branch =
            opcode == ActionCode::Jump.as_u8() || opcode == ActionCode::If.as_u8();
        if is_branch {
            match stream.read_i16() {
                Ok(offset) if offset < 0 => return true,
                Ok(_) => {}
                Err(_) => return false,
            }
            if stream.skip((length as usize).saturating_sub(2)).is_err() {
                return false;
            }
        } else if stream.skip(length as usize).is_err() {
            return false;
        }
    }
    false
}

fuzz_target!(|data: &[u8]| {
    if data.len() > 10_000 || has_backward_branch(data) {
        return;
    }

    // Errors are expected; panics are not
    let mut avm = Avm::new();
    let _ = avm.run_script(data);
});
