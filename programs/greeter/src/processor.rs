use solana_program::{
    account_info::{next_account_info, AccountInfo},
    entrypoint::ProgramResult,
    msg,
    program_error::ProgramError,
    pubkey::Pubkey,
};

use crate::state::GreetingCounter;

/// Greet and bump the counter stored in the first account
///
/// Accounts:
/// 0. `[writable]` greeted account, owned by this program, at least 4 bytes
///
/// Instruction data is an optional UTF-8 name.
pub fn process_instruction(
    program_id: &Pubkey,
    accounts: &[AccountInfo],
    instruction_data: &[u8],
) -> ProgramResult {
    msg!("Greeter program entrypoint");
    msg!("Program ID: {}", program_id);

    let accounts_iter = &mut accounts.iter();
    let greeted = next_account_info(accounts_iter)?;

    if greeted.owner != program_id {
        msg!("Greeted account {} is not owned by this program", greeted.key);
        return Err(ProgramError::IncorrectProgramId);
    }

    if instruction_data.is_empty() {
        msg!("Hello, Solana!");
    } else {
        msg!("Hello, {}!", String::from_utf8_lossy(instruction_data));
    }

    let mut data = greeted.try_borrow_mut_data()?;
    let mut counter = GreetingCounter::unpack(&data[..]).map_err(|e| {
        msg!("Account data too small to store counter");
        e
    })?;
    let count = counter.increment()?;
    counter.pack(&mut data[..])?;

    msg!("Greeting count: {}", count);
    Ok(())
}
