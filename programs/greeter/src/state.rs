use solana_program::program_error::ProgramError;

/// Bytes occupied by the greeting counter at the start of account data
pub const COUNTER_LEN: usize = 4;

/// Little-endian u32 greeting counter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct GreetingCounter {
    pub count: u32,
}

impl GreetingCounter {
    pub fn unpack(data: &[u8]) -> Result<Self, ProgramError> {
        let bytes: [u8; COUNTER_LEN] = data
            .get(..COUNTER_LEN)
            .and_then(|slice| slice.try_into().ok())
            .ok_or(ProgramError::InvalidAccountData)?;

        Ok(Self {
            count: u32::from_le_bytes(bytes),
        })
    }

    pub fn pack(&self, data: &mut [u8]) -> Result<(), ProgramError> {
        let dst = data
            .get_mut(..COUNTER_LEN)
            .ok_or(ProgramError::InvalidAccountData)?;
        dst.copy_from_slice(&self.count.to_le_bytes());
        Ok(())
    }

    pub fn increment(&mut self) -> Result<u32, ProgramError> {
        self.count = self
            .count
            .checked_add(1)
            .ok_or(ProgramError::ArithmeticOverflow)?;
        Ok(self.count)
    }
}
