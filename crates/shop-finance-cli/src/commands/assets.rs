use clap::Args;
use serde_json::Value;

use shop_finance_core::assets::register::{self, AssetRegisterInput};

use crate::input;

/// Arguments for the asset register summary
#[derive(Args)]
pub struct RegisterArgs {
    /// Path to JSON input file ({"assets": [...], "as_of_date": "YYYY-MM-DD"})
    #[arg(long)]
    pub input: Option<String>,
}

pub fn run_asset_register(args: RegisterArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let register_input: AssetRegisterInput = if let Some(ref path) = args.input {
        input::file::read_json(path)?
    } else if let Some(data) = input::stdin::read_stdin()? {
        data
    } else {
        return Err("--input file (or piped JSON) is required for the asset register".into());
    };

    let result = register::summarize_register(&register_input)?;
    Ok(serde_json::to_value(result)?)
}
