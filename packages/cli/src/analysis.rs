//! Interactive ROI analysis loop.
//!
//! Mirrors the map frontend's flow in the terminal: pick a year and an
//! ROI, run one analysis, print the per-class area table, repeat.
//! Catalog and session bootstrap failures are fatal; per-interaction
//! failures are reported and the loop keeps its state.

use std::path::PathBuf;

use console::style;
use dialoguer::{Confirm, Select};
use landcover_map_catalog::{CatalogCache, DEFAULT_CATALOG_PATH, RegionCatalog};
use landcover_map_classes::{ClassAreaRow, YEAR_DEFAULT, YEAR_MAX, YEAR_MIN};
use landcover_map_geometry::to_boundary_region;
use landcover_map_presentation::enrich;
use landcover_map_stats::{EeSession, compute_area_by_class};

/// Runs the interactive analysis loop.
///
/// # Errors
///
/// Returns an error if a terminal prompt fails. Analysis failures are
/// reported inline and do not end the loop.
pub async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let catalog_path = PathBuf::from(
        std::env::var("ROI_CATALOG_PATH").unwrap_or_else(|_| DEFAULT_CATALOG_PATH.to_string()),
    );
    let cache = CatalogCache::new();
    let catalog = match cache.get_or_load(&catalog_path) {
        Ok(catalog) => catalog,
        Err(e) => {
            eprintln!("Cannot load the ROI catalog: {e}");
            std::process::exit(1);
        }
    };

    let names = catalog.names();
    if names.is_empty() {
        eprintln!(
            "No feature with a Name property found in {} (the property name is case-sensitive)",
            catalog_path.display()
        );
        std::process::exit(1);
    }

    let session = match EeSession::from_env() {
        Ok(session) => session,
        Err(e) => {
            eprintln!("Cannot bootstrap the remote service session: {e}");
            std::process::exit(1);
        }
    };

    println!("Pick a year and an ROI; the analysis reports the area of every");
    println!("land-cover class inside the ROI for that year.");
    println!();

    let years: Vec<u16> = (YEAR_MIN..=YEAR_MAX).collect();
    let year_labels: Vec<String> = years.iter().map(ToString::to_string).collect();
    // The selected year persists across interactions within a session.
    let mut year_idx = usize::from(YEAR_DEFAULT - YEAR_MIN);

    loop {
        year_idx = Select::new()
            .with_prompt("Year")
            .items(&year_labels)
            .default(year_idx)
            .interact()?;
        let year = years[year_idx];

        let name_idx = Select::new()
            .with_prompt("ROI (Name)")
            .items(&names)
            .default(0)
            .interact()?;
        let name = &names[name_idx];

        if let Err(e) = analyze_once(&session, catalog, name, year).await {
            eprintln!("{} {e}", style("Analysis failed:").red().bold());
        }

        println!();
        if !Confirm::new()
            .with_prompt("Analyze another region?")
            .default(true)
            .interact()?
        {
            break;
        }
        println!();
    }

    Ok(())
}

/// One full pipeline run: lookup, convert, request, present.
async fn analyze_once(
    session: &EeSession,
    catalog: &RegionCatalog,
    name: &str,
    year: u16,
) -> Result<(), Box<dyn std::error::Error>> {
    let feature = catalog
        .find_by_name(name)
        .ok_or_else(|| format!("no ROI named {name:?} in the catalog"))?;

    let boundary_region = to_boundary_region(feature)?;
    log::info!(
        "Analyzing {name:?} ({} sub-region(s)) for {year}",
        boundary_region.regions.len()
    );

    let rows = compute_area_by_class(session, &boundary_region.boundary, year).await?;
    if rows.is_empty() {
        println!(
            "{} No area computed for ROI {name:?} — check that the geometry lies within \
             Brazil and that year {year} has data.",
            style("Note:").yellow().bold()
        );
        return Ok(());
    }

    print_table(name, year, &enrich(rows));
    Ok(())
}

/// Prints the per-class area table with a proportional bar column.
fn print_table(region: &str, year: u16, rows: &[ClassAreaRow]) {
    let max_area = rows.iter().map(|row| row.area_ha).fold(0.0, f64::max);
    let name_width = rows
        .iter()
        .map(|row| row.name.chars().count())
        .chain(std::iter::once("Nome da Classe".len()))
        .max()
        .unwrap_or(0);

    println!();
    println!("{}", style(format!("Área por classe — {region} ({year})")).bold());
    println!(
        "{:>6}  {:<name_width$}  {:>14}",
        style("Classe").bold(),
        style("Nome da Classe").bold(),
        style("Área (ha)").bold(),
    );
    for row in rows {
        println!(
            "{:>6}  {:<name_width$}  {:>14.2}  {}",
            row.class_code,
            row.name,
            row.area_ha,
            area_bar(row.area_ha, max_area),
        );
    }

    let total: f64 = rows.iter().map(|row| row.area_ha).sum();
    println!("{:>6}  {:<name_width$}  {total:>14.2}", "", style("Total").bold());
}

/// Renders a bar proportional to `area / max_area`.
///
/// Any non-zero area shows at least one block so small classes stay
/// visible next to dominant ones.
#[allow(clippy::cast_possible_truncation, clippy::cast_precision_loss, clippy::cast_sign_loss)]
fn area_bar(area: f64, max_area: f64) -> String {
    const WIDTH: usize = 28;
    if max_area <= 0.0 || area <= 0.0 {
        return String::new();
    }
    let filled = ((area / max_area) * WIDTH as f64).round() as usize;
    "█".repeat(filled.clamp(1, WIDTH))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bar_is_proportional_to_area() {
        assert_eq!(area_bar(300.0, 300.0).chars().count(), 28);
        assert_eq!(area_bar(150.0, 300.0).chars().count(), 14);
    }

    #[test]
    fn small_nonzero_areas_keep_one_block() {
        assert_eq!(area_bar(0.01, 300.0).chars().count(), 1);
    }

    #[test]
    fn zero_and_degenerate_inputs_render_nothing() {
        assert_eq!(area_bar(0.0, 300.0), "");
        assert_eq!(area_bar(10.0, 0.0), "");
    }
}
