use solana_program::declare_id;

declare_id!("Xx7cEWNkXWJWjRNNwXZZxicQpL2abzwhWHroXD64fSE");

pub mod processor;
pub mod state;

#[cfg(not(feature = "no-entrypoint"))]
use processor::process_instruction;

#[cfg(not(feature = "no-entrypoint"))]
solana_program::entrypoint!(process_instruction);
