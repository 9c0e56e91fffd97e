// Application layer: wires config, adapters and core together for each CLI subcommand.

pub mod commands;
