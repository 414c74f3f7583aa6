//! Output formatting module

use manifest_domain::model::StatusTaxonomy;
use manifest_domain::service::{MergedRow, SummaryRow};
use manifest_types::{Archive, Column, OutputFormat, Result, Shift, StatusPath, Vehicle};
use serde::Serialize;

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    let content = serde_json::to_string_pretty(value)?;
    println!("{}", content);
    Ok(())
}

/// Left-aligned table sized to its widest cell per column
fn print_table(headers: &[String], rows: &[Vec<String>]) {
    let mut widths: Vec<usize> = headers.iter().map(|h| h.chars().count()).collect();
    for row in rows {
        for (w, cell) in widths.iter_mut().zip(row) {
            *w = (*w).max(cell.chars().count());
        }
    }

    let line = |cells: &[String]| {
        cells
            .iter()
            .zip(&widths)
            .map(|(c, &w)| format!("{:<w$}", c, w = w))
            .collect::<Vec<_>>()
            .join("  ")
            .trim_end()
            .to_string()
    };

    println!("{}", line(headers));
    println!("{}", "-".repeat(widths.iter().sum::<usize>() + 2 * widths.len().saturating_sub(1)));
    for row in rows {
        println!("{}", line(row));
    }
}

/// Display text for a cell; empty status values show the placeholder
fn cell(column: &Column, value: &str, placeholder: &str) -> String {
    if column.is_hierarchical() {
        StatusPath::parse(value).label(placeholder)
    } else {
        value.to_string()
    }
}

pub fn output_columns(output_format: OutputFormat, columns: &[Column]) -> Result<()> {
    if output_format == OutputFormat::Json {
        return print_json(columns);
    }

    let headers = ["#", "Id", "Label", "Type", "Fixed"].map(String::from);
    let rows: Vec<Vec<String>> = columns
        .iter()
        .enumerate()
        .map(|(i, c)| {
            vec![
                i.to_string(),
                c.id.clone(),
                c.label.clone(),
                c.column_type.to_string(),
                if c.fixed { "yes" } else { "" }.to_string(),
            ]
        })
        .collect();
    print_table(&headers, &rows);
    Ok(())
}

pub fn output_vehicles(output_format: OutputFormat, fleet: &[Vehicle]) -> Result<()> {
    if output_format == OutputFormat::Json {
        return print_json(fleet);
    }

    if fleet.is_empty() {
        println!("No vehicles registered.");
        return Ok(());
    }
    let headers = ["Plate", "Driver"].map(String::from);
    let rows: Vec<Vec<String>> = fleet
        .iter()
        .map(|v| vec![v.plate.clone(), v.driver.clone()])
        .collect();
    print_table(&headers, &rows);
    Ok(())
}

pub fn output_names(output_format: OutputFormat, title: &str, names: &[String]) -> Result<()> {
    if output_format == OutputFormat::Json {
        return print_json(names);
    }

    println!("{} ({})", title, names.len());
    for name in names {
        println!("  {}", name);
    }
    Ok(())
}

pub fn output_taxonomy(output_format: OutputFormat, taxonomy: &StatusTaxonomy) -> Result<()> {
    if output_format == OutputFormat::Json {
        return print_json(taxonomy);
    }

    if taxonomy.is_empty() {
        println!("No status options defined.");
        return Ok(());
    }
    for main in taxonomy.main_names() {
        println!("{}", main);
        for sub in taxonomy.sub_names(main) {
            println!("  {}", sub);
            for sub_sub in taxonomy.sub_sub_names(main, sub) {
                println!("    {}", sub_sub);
            }
        }
    }
    Ok(())
}

pub fn output_shift(
    output_format: OutputFormat,
    shift: Shift,
    columns: &[Column],
    rows: &[MergedRow],
    placeholder: &str,
) -> Result<()> {
    if output_format == OutputFormat::Json {
        return print_json(rows);
    }

    println!("{} shift", shift.label());
    println!();
    if rows.is_empty() {
        println!("No vehicles registered.");
        return Ok(());
    }

    let headers: Vec<String> = columns
        .iter()
        .map(|c| c.label.clone())
        .chain(std::iter::once("Time".to_string()))
        .collect();
    let table: Vec<Vec<String>> = rows
        .iter()
        .map(|row| {
            columns
                .iter()
                .map(|c| cell(c, row.value(&c.id), placeholder))
                .chain(std::iter::once(row.time.clone()))
                .collect()
        })
        .collect();
    print_table(&headers, &table);
    Ok(())
}

pub fn output_summary(
    output_format: OutputFormat,
    columns: &[Column],
    rows: &[SummaryRow],
    placeholder: &str,
) -> Result<()> {
    if output_format == OutputFormat::Json {
        return print_json(rows);
    }

    println!("Summary");
    println!("=======");
    if rows.is_empty() {
        println!("No vehicles registered.");
        return Ok(());
    }

    let headers: Vec<String> = columns
        .iter()
        .map(|c| c.label.clone())
        .chain(["Shift".to_string(), "Time".to_string()])
        .collect();
    let table: Vec<Vec<String>> = rows
        .iter()
        .map(|row| {
            let shift = row.shift.map(|s| s.label()).unwrap_or("-").to_string();
            columns
                .iter()
                .map(|c| {
                    let value = row.value(&c.id);
                    if value.is_empty() && c.id == manifest_types::PLATE_COLUMN_ID {
                        row.plate.clone()
                    } else {
                        cell(c, value, placeholder)
                    }
                })
                .chain([shift, row.time.clone()])
                .collect()
        })
        .collect();
    print_table(&headers, &table);
    Ok(())
}

pub fn output_archive_list(output_format: OutputFormat, archives: &[&Archive]) -> Result<()> {
    if output_format == OutputFormat::Json {
        let dates: Vec<String> = archives.iter().map(|a| a.date.to_string()).collect();
        return print_json(&dates);
    }

    if archives.is_empty() {
        println!("No archives.");
        return Ok(());
    }
    let headers = ["Date", "Morning", "Midday", "Evening"].map(String::from);
    let rows: Vec<Vec<String>> = archives
        .iter()
        .map(|a| {
            std::iter::once(a.date.to_string())
                .chain(Shift::ALL.iter().map(|&s| a.data.bucket(s).len().to_string()))
                .collect()
        })
        .collect();
    print_table(&headers, &rows);
    Ok(())
}

pub fn output_archive(
    output_format: OutputFormat,
    archive: &Archive,
    columns: &[Column],
    placeholder: &str,
) -> Result<()> {
    if output_format == OutputFormat::Json {
        return print_json(archive);
    }

    println!("Archive {}", archive.date);
    println!("==================");
    let headers: Vec<String> = columns
        .iter()
        .map(|c| c.label.clone())
        .chain(std::iter::once("Time".to_string()))
        .collect();
    for shift in Shift::ALL {
        println!();
        println!("{}", shift.label());
        let records = archive.data.bucket(shift);
        if records.is_empty() {
            println!("  (no records)");
            continue;
        }
        let table: Vec<Vec<String>> = records
            .iter()
            .map(|r| {
                columns
                    .iter()
                    .map(|c| cell(c, r.value(&c.id), placeholder))
                    .chain(std::iter::once(r.time.clone()))
                    .collect()
            })
            .collect();
        print_table(&headers, &table);
    }
    Ok(())
}
