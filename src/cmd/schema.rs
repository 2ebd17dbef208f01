//! Schema command - print the expected billing record input format

use crate::bill::Bill;
use clap::Args;
use schemars::schema_for;

#[derive(Args, Debug)]
pub struct SchemaCommand {
    /// Output format
    #[arg(value_enum, default_value = "json-schema")]
    format: SchemaFormat,
}

#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum SchemaFormat {
    /// JSON Schema for the billing record file
    JsonSchema,
    /// A complete example billing record
    Example,
}

impl SchemaCommand {
    pub fn exec(&self) -> anyhow::Result<()> {
        match self.format {
            SchemaFormat::JsonSchema => {
                let schema = schema_for!(Bill);
                println!("{}", serde_json::to_string_pretty(&schema)?);
            }
            SchemaFormat::Example => println!("{}", EXAMPLE_BILL.trim()),
        }
        Ok(())
    }
}

const EXAMPLE_BILL: &str = r#"
{
  "report_date": "2016-05-05",
  "customer_id": 100,
  "customer_name": "John Doré",
  "start_date": "2016-04-01",
  "end_date": "2016-04-30",
  "offpeak_usage": 90.0,
  "onpeak_usage": 10.0,
  "offpeak_cost": 45.0,
  "onpeak_cost": 10.0,
  "final_cost": 55.0,
  "curr_rate": 60.0,
  "rate_highlow": "LOWER",
  "rate_difference": 5.00,
  "rebate": 5.00,
  "rebate_closing_balance": 10.00
}
"#;
