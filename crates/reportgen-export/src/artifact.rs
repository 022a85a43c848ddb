use flate2::Compression;
use flate2::write::GzEncoder;
use tracing::debug;

use reportgen_core::models::monster::Monster;

use crate::error::ExportError;

pub const CONTENT_TYPE: &str = "text/csv";
pub const CONTENT_ENCODING: &str = "gzip";

pub const HEADER: [&str; 8] = [
    "name",
    "id",
    "category",
    "description",
    "image",
    "common_locations",
    "drops",
    "dlc",
];

/// Separator used to flatten list-valued fields into a single cell.
const LIST_SEPARATOR: &str = ", ";

/// Render records as CSV (fixed header, one row per record) and gzip the
/// result in memory.
///
/// Cells containing the delimiter or quotes are quoted per RFC 4180, so a
/// flattened list with more than one element lands in a quoted cell.
pub fn render_monsters(monsters: &[Monster]) -> Result<Vec<u8>, ExportError> {
    let encoder = GzEncoder::new(Vec::new(), Compression::default());
    let mut writer = csv::Writer::from_writer(encoder);

    writer.write_record(HEADER)?;
    for monster in monsters {
        writer.write_record(row(monster))?;
    }

    let encoder = writer.into_inner()?;
    let bytes = encoder.finish()?;

    debug!(rows = monsters.len(), bytes = bytes.len(), "rendered csv artifact");
    Ok(bytes)
}

fn row(monster: &Monster) -> [String; 8] {
    [
        monster.name.clone(),
        monster.id.to_string(),
        monster.category.clone(),
        monster.description.clone(),
        monster.image.clone(),
        monster.common_locations.join(LIST_SEPARATOR),
        monster.drops.join(LIST_SEPARATOR),
        monster.dlc.to_string(),
    ]
}
