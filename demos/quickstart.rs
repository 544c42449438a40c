use vardate::{date_difference, DiffUnit, Temporal, VarDate};

fn main() -> vardate::Result<()> {
    let release: VarDate = "2014-12-04T15:22:23.123456789".parse()?;
    let next_audit = release.add_months(18)?;

    println!("release:    {release}");
    println!("next audit: {next_audit}");
    println!("local:      {}", release.format("[America/New_York]yyyy-MM-dd h:mm a z")?);
    println!(
        "days apart: {}",
        date_difference(&release, &next_audit, DiffUnit::Days)?
    );

    let upper: Temporal = "%latest".parse()?;
    println!("upper bound is latest: {}", upper.is_latest());
    Ok(())
}
