//! JSON tool configuration for the CLI runner.
//!
//! A session needs the calibrated region masks (one image per region),
//! optionally a segment table (standard board when omitted), a frame
//! directory and the detector parameters. File format follows the other
//! tool configs in this workspace: plain JSON with serde defaults.
use crate::board::{BoardMasks, SegmentRange, SegmentTable};
use crate::detector::DartParams;
use crate::image::io::load_mask;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Deserialize)]
pub struct ScoreToolConfig {
    /// Directory of frame images, ordered by file name.
    pub frames: PathBuf,
    /// Source frame rate (scan window length).
    pub fps: f64,
    pub masks: MaskPaths,
    /// JSON array of `{min_deg, max_deg, value}` entries; standard board
    /// layout when omitted.
    #[serde(default)]
    pub segment_table: Option<PathBuf>,
    #[serde(default)]
    pub params: DartParams,
    /// Where to write the resolved events JSON.
    pub output: PathBuf,
}

#[derive(Debug, Deserialize)]
pub struct MaskPaths {
    pub dartboard: PathBuf,
    pub inner_bull: PathBuf,
    pub outer_bull: PathBuf,
    pub triple: PathBuf,
    pub double: PathBuf,
    pub single: PathBuf,
}

pub fn load_config(path: &Path) -> Result<ScoreToolConfig, String> {
    let data = fs::read_to_string(path)
        .map_err(|e| format!("Failed to read config {}: {e}", path.display()))?;
    serde_json::from_str(&data)
        .map_err(|e| format!("Failed to parse config {}: {e}", path.display()))
}

/// Load and validate the region model named by the config.
pub fn load_board(config: &ScoreToolConfig) -> Result<BoardMasks, String> {
    BoardMasks::new(
        load_mask(&config.masks.dartboard)?,
        load_mask(&config.masks.inner_bull)?,
        load_mask(&config.masks.outer_bull)?,
        load_mask(&config.masks.triple)?,
        load_mask(&config.masks.double)?,
        load_mask(&config.masks.single)?,
    )
    .map_err(|e| format!("Invalid region model: {e}"))
}

/// Load the segment table, or the standard board layout when the config
/// names none.
pub fn load_table(config: &ScoreToolConfig) -> Result<SegmentTable, String> {
    let Some(path) = config.segment_table.as_ref() else {
        return Ok(SegmentTable::standard());
    };
    let data = fs::read_to_string(path)
        .map_err(|e| format!("Failed to read segment table {}: {e}", path.display()))?;
    let entries: Vec<SegmentRange> = serde_json::from_str(&data)
        .map_err(|e| format!("Failed to parse segment table {}: {e}", path.display()))?;
    SegmentTable::new(entries).map_err(|e| format!("Invalid segment table: {e}"))
}
