use crate::view::ConfigRow;
use gremlab_core::GremlabConfig;
use tabled::{Table, settings::Style};

pub fn run(config: &GremlabConfig) -> Result<(), Box<dyn std::error::Error>> {
    let rows = ConfigRow::from_config(config);
    println!("{}", Table::new(&rows).with(Style::psql()).to_string());
    Ok(())
}
