//! Import a community card list from CSV into a per-source dictionary.
//! Reads data/import/<tag>_cards.csv, writes data/sources/<tag>.json.
//! CSV columns: id, name, slot, faction, points, unique, unique_classes,
//! modification, bound_ship_type, traits, sizes, text (header row required).
//! List-valued columns use ';' separators.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let tag = std::env::args()
        .nth(1)
        .ok_or("usage: import_community_cards <source-tag>")?;

    let manifest_dir = std::env::var("CARGO_MANIFEST_DIR").unwrap_or_else(|_| ".".to_string());
    let input_path = Path::new(&manifest_dir).join(format!("data/import/{tag}_cards.csv"));
    let output_path = Path::new(&manifest_dir).join(format!("data/sources/{tag}.json"));

    let csv_content = fs::read_to_string(&input_path).map_err(|e| {
        format!(
            "Read {}: {}. Create data/import/ and add {tag}_cards.csv (columns: id, name, slot, faction, points, unique, unique_classes, modification, bound_ship_type, traits, sizes, text)",
            input_path.display(),
            e
        )
    })?;

    let mut reader = csv::Reader::from_reader(csv_content.as_bytes());
    let mut upgrades: BTreeMap<String, serde_json::Value> = BTreeMap::new();

    for result in reader.records() {
        let record = result?;
        let row = CsvRow::from_record(&record)?;
        let id = row.id.trim().to_string();
        if id.is_empty() {
            continue;
        }

        let mut entry = serde_json::json!({
            "name": row.name.trim(),
            "slot": row.slot.trim(),
            "points": row.points,
        });
        if !row.faction.trim().is_empty() {
            entry["faction"] = serde_json::json!(row.faction.trim());
        }
        if row.unique {
            entry["unique"] = serde_json::json!(true);
        }
        if !row.unique_classes.is_empty() {
            entry["unique_classes"] = serde_json::json!(row.unique_classes);
        }
        if row.modification {
            entry["modification"] = serde_json::json!(true);
        }
        if !row.bound_ship_type.trim().is_empty() {
            entry["bound_ship_type"] = serde_json::json!(row.bound_ship_type.trim());
        }
        let mut restrictions = serde_json::Map::new();
        if !row.traits.is_empty() {
            restrictions.insert("traits".to_string(), serde_json::json!(row.traits));
        }
        if !row.sizes.is_empty() {
            restrictions.insert("sizes".to_string(), serde_json::json!(row.sizes));
        }
        if !restrictions.is_empty() {
            entry["restrictions"] = serde_json::Value::Object(restrictions);
        }
        if !row.text.trim().is_empty() {
            entry["text"] = serde_json::json!(row.text.trim());
        }

        upgrades.insert(id, entry);
    }

    let payload = serde_json::json!({
        "data_version": chrono::Utc::now().format("%Y-%m-%d").to_string(),
        "upgrades": upgrades,
    });

    if let Some(parent) = output_path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(&output_path, serde_json::to_string_pretty(&payload)?)?;
    println!(
        "Wrote {} upgrades to {}",
        payload["upgrades"].as_object().map(|m| m.len()).unwrap_or(0),
        output_path.display()
    );
    Ok(())
}

struct CsvRow {
    id: String,
    name: String,
    slot: String,
    faction: String,
    points: u32,
    unique: bool,
    unique_classes: Vec<String>,
    modification: bool,
    bound_ship_type: String,
    traits: Vec<String>,
    sizes: Vec<String>,
    text: String,
}

impl CsvRow {
    fn from_record(record: &csv::StringRecord) -> Result<Self, Box<dyn std::error::Error>> {
        if record.len() < 3 {
            return Err("CSV row needs at least 3 columns: id, name, slot".into());
        }
        Ok(CsvRow {
            id: record.get(0).unwrap_or("").to_string(),
            name: record.get(1).unwrap_or("").to_string(),
            slot: record.get(2).unwrap_or("").to_string(),
            faction: record.get(3).unwrap_or("").to_string(),
            points: record
                .get(4)
                .and_then(|s| s.trim().parse::<u32>().ok())
                .unwrap_or(0),
            unique: parse_flag(record.get(5)),
            unique_classes: parse_list(record.get(6)),
            modification: parse_flag(record.get(7)),
            bound_ship_type: record.get(8).unwrap_or("").to_string(),
            traits: parse_list(record.get(9)),
            sizes: parse_list(record.get(10)),
            text: record.get(11).unwrap_or("").to_string(),
        })
    }
}

fn parse_flag(raw: Option<&str>) -> bool {
    matches!(
        raw.map(str::trim),
        Some("1") | Some("true") | Some("yes") | Some("TRUE")
    )
}

fn parse_list(raw: Option<&str>) -> Vec<String> {
    raw.unwrap_or("")
        .split(';')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(str::to_string)
        .collect()
}
