use std::env;

use sailpolar::{convex_direction, from_csv, FillConfig, MissingValueFiller, PolarFormat};

fn main() -> sailpolar::Result<()> {
    let mut args = env::args().skip(1);
    let path = args.next().unwrap_or_else(|| "mock/incomplete_orc_format_example.csv".into());
    let format: PolarFormat = args.next().as_deref().unwrap_or("orc").parse()?;
    let filler = match args.next() {
        Some(config_path) => MissingValueFiller::from_config(&FillConfig::load(config_path)?)?,
        None => MissingValueFiller::default(),
    };

    println!("Reading {} polar diagram from {}", format, path);

    let table = from_csv(&path, format, true, Some(&filler))?.symmetrize();

    println!("{}", table);
    println!("Interpolation performed: {}", table.interpolation_performed());
    println!("Max boat speed: {:.2}", table.max_boat_speed());

    let wind_speed = table.wind_speeds()[table.wind_speeds().len() / 2];
    println!("Beating upwind in {} knots:", wind_speed);
    match convex_direction(&table, wind_speed, 0.0) {
        Ok(directions) => directions.iter().for_each(|d| println!("  {}", d)),
        Err(e) => println!("  {}", e),
    }

    let output = "filled_polar.hro";
    table.to_csv(output)?;
    println!("Wrote {}", output);

    Ok(())
}
