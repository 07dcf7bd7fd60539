//! Command-line arguments.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "mint-demo")]
#[command(about = "Mint NFTs from the command line")]
#[command(version)]
pub struct Cli {
	#[command(subcommand)]
	pub command: Commands,

	/// Enable debug logging
	#[arg(global = true, long, env = "MINT_DEBUG")]
	pub debug: bool,

	/// Config file path; defaults and MINT_* variables are used without one
	#[arg(global = true, long, env = "MINT_CONFIG")]
	pub config: Option<PathBuf>,

	/// Index of the signer key to use as the connected account
	#[arg(global = true, long)]
	pub account: Option<usize>,
}

#[derive(Subcommand)]
pub enum Commands {
	/// Connect, read the collection and show the mint panel
	Status,
	/// Connect the wallet to the target network
	Connect,
	/// Mint tokens for the connected account
	Mint {
		/// Number of tokens to mint
		#[arg(short, long, default_value_t = 1)]
		quantity: u64,
	},
	/// Show the target network descriptor
	Network,
}
