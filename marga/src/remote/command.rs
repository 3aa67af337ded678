//! Remote command byte decoding

/// Command understood by the interpreter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemoteCommand {
    ForwardJog,
    BackJog,
    LeftJog,
    RightJog,
    ReturnToOrigin,
}

impl RemoteCommand {
    /// Decode a received byte. Anything else is ignored by the interpreter.
    pub fn from_byte(byte: u8) -> Option<Self> {
        match byte {
            b'8' => Some(Self::ForwardJog),
            b'2' => Some(Self::BackJog),
            b'4' => Some(Self::LeftJog),
            b'6' => Some(Self::RightJog),
            b'7' => Some(Self::ReturnToOrigin),
            _ => None,
        }
    }

    pub fn to_byte(self) -> u8 {
        match self {
            Self::ForwardJog => b'8',
            Self::BackJog => b'2',
            Self::LeftJog => b'4',
            Self::RightJog => b'6',
            Self::ReturnToOrigin => b'7',
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keypad_layout() {
        assert_eq!(RemoteCommand::from_byte(b'8'), Some(RemoteCommand::ForwardJog));
        assert_eq!(RemoteCommand::from_byte(b'2'), Some(RemoteCommand::BackJog));
        assert_eq!(RemoteCommand::from_byte(b'4'), Some(RemoteCommand::LeftJog));
        assert_eq!(RemoteCommand::from_byte(b'6'), Some(RemoteCommand::RightJog));
        assert_eq!(RemoteCommand::from_byte(b'7'), Some(RemoteCommand::ReturnToOrigin));
        assert_eq!(RemoteCommand::ReturnToOrigin.to_byte(), b'7');
    }

    #[test]
    fn test_other_bytes_ignored() {
        for byte in [b'0', b'1', b'3', b'5', b'9', b'x', b'\n', 0x00, 0xFF] {
            assert_eq!(RemoteCommand::from_byte(byte), None, "byte {:#04x}", byte);
        }
    }
}
