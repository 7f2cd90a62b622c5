//! Per-disk capacity bars.
//!
//! Shows up to three disks, each with its filesystem, name, mount point,
//! used/total byte counts, and a usage bar. The panel is sliced into three
//! fixed rows so a machine with one disk renders the same geometry as a
//! machine with five.

use crate::color::Rgba;
use crate::scene::{Scene, TextAnchor};
use crate::units::format_bytes;

const MAX_DISKS: usize = 3;
const PAD: f64 = 8.0;
const ICON_GLYPH: &str = "\u{1f5b4}";
const PRIMARY: Rgba = Rgba::WHITE;
const SECONDARY: Rgba = Rgba::rgb(0xaa, 0xaa, 0xaa);
const BAR_TRACK: Rgba = Rgba::new(255, 255, 255, 0x22);
const BAR_FILL: Rgba = Rgba::rgb(0x4f, 0xac, 0xfe);
const BAR_HEIGHT: f64 = 4.0;

/// One disk's identity and capacity, as reported by the metric source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiskInfo {
    /// Volume label; may be empty.
    pub name: String,
    /// Disk kind (HDD, SSD, ...), shown when the label is empty.
    pub kind: String,
    /// Mount point path.
    pub mount_point: String,
    /// Filesystem name (ext4, apfs, ...).
    pub file_system: String,
    /// Total capacity in bytes.
    pub total_space: u64,
    /// Unused capacity in bytes.
    pub available_space: u64,
}

impl DiskInfo {
    /// Bytes currently in use.
    #[must_use]
    pub fn used_space(&self) -> u64 {
        self.total_space.saturating_sub(self.available_space)
    }

    /// Used fraction in `0..=1`; a zero-capacity disk reads as empty.
    #[must_use]
    pub fn used_fraction(&self) -> f64 {
        if self.total_space == 0 {
            return 0.0;
        }
        self.used_space() as f64 / self.total_space as f64
    }

    /// Volume label, falling back to the disk kind.
    #[must_use]
    pub fn display_name(&self) -> &str {
        if self.name.is_empty() {
            &self.kind
        } else {
            &self.name
        }
    }
}

/// View model for the disk usage widget.
#[derive(Debug, Clone, Default)]
pub struct DiskUsage;

impl DiskUsage {
    /// Create the widget.
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Build the scene for the first three reported disks.
    #[must_use]
    pub fn scene(&self, width: f64, height: f64, disks: &[DiskInfo]) -> Scene {
        let mut scene = Scene::new(width, height);
        let row_height = height / MAX_DISKS as f64;
        let bar_width = width - 2.0 * PAD;

        for (i, disk) in disks.iter().take(MAX_DISKS).enumerate() {
            let top = i as f64 * row_height + PAD;
            let percent = (disk.used_fraction() * 100.0).round();

            scene = scene
                .glyph(PAD, top, 11.0, ICON_GLYPH, SECONDARY)
                .text(PAD + 16.0, top + 9.0, &disk.file_system, 10.0, SECONDARY)
                .text(PAD, top + 22.0, disk.display_name(), 11.0, PRIMARY)
                .text(PAD, top + 34.0, &disk.mount_point, 10.0, SECONDARY)
                .text(
                    PAD,
                    top + 46.0,
                    format!(
                        "{} / {}",
                        format_bytes(disk.used_space() as f64),
                        format_bytes(disk.total_space as f64)
                    ),
                    10.0,
                    PRIMARY,
                )
                .text_anchored(
                    width - PAD,
                    top + 46.0,
                    format!("{percent}%"),
                    10.0,
                    SECONDARY,
                    TextAnchor::End,
                )
                .rect(PAD, top + 52.0, bar_width, BAR_HEIGHT, BAR_TRACK)
                .rect(PAD, top + 52.0, bar_width * percent / 100.0, BAR_HEIGHT, BAR_FILL);
        }

        scene
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::SceneElement;

    fn disk(name: &str, total: u64, available: u64) -> DiskInfo {
        DiskInfo {
            name: name.to_string(),
            kind: "SSD".to_string(),
            mount_point: "/".to_string(),
            file_system: "ext4".to_string(),
            total_space: total,
            available_space: available,
        }
    }

    fn texts(scene: &Scene) -> Vec<String> {
        scene
            .elements()
            .iter()
            .filter_map(|e| match e {
                SceneElement::Text { text, .. } => Some(text.clone()),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_used_space_and_fraction() {
        let disk = disk("data", 1000, 250);
        assert_eq!(disk.used_space(), 750);
        assert!((disk.used_fraction() - 0.75).abs() < 1e-12);
    }

    #[test]
    fn test_zero_capacity_reads_empty() {
        let disk = disk("ghost", 0, 0);
        assert_eq!(disk.used_space(), 0);
        assert!((disk.used_fraction() - 0.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_display_name_falls_back_to_kind() {
        let named = disk("data", 10, 5);
        assert_eq!(named.display_name(), "data");

        let unnamed = disk("", 10, 5);
        assert_eq!(unnamed.display_name(), "SSD");
    }

    #[test]
    fn test_scene_shows_at_most_three_disks() {
        let disks = vec![
            disk("a", 100, 50),
            disk("b", 100, 50),
            disk("c", 100, 50),
            disk("d", 100, 50),
        ];
        let scene = DiskUsage::new().scene(200.0, 300.0, &disks);

        let names = texts(&scene);
        assert!(names.contains(&"a".to_string()));
        assert!(names.contains(&"c".to_string()));
        assert!(!names.contains(&"d".to_string()), "fourth disk is dropped");
    }

    #[test]
    fn test_scene_empty_input() {
        let scene = DiskUsage::new().scene(200.0, 300.0, &[]);
        assert!(scene.elements().is_empty());
    }

    #[test]
    fn test_usage_label_and_percent() {
        let scene = DiskUsage::new().scene(200.0, 300.0, &[disk("data", 1_073_741_824, 0)]);

        let labels = texts(&scene);
        assert!(labels.contains(&"1.00 GB / 1.00 GB".to_string()), "labels: {labels:?}");
        assert!(labels.contains(&"100%".to_string()));
    }

    #[test]
    fn test_bar_width_tracks_percent() {
        // 50% used on a 216px panel: the track spans 200, the fill 100.
        let scene = DiskUsage::new().scene(216.0, 300.0, &[disk("data", 1000, 500)]);

        let bars: Vec<f64> = scene
            .elements()
            .iter()
            .filter_map(|e| match e {
                SceneElement::Rect { width, .. } => Some(*width),
                _ => None,
            })
            .collect();
        assert_eq!(bars.len(), 2);
        assert!((bars[0] - 200.0).abs() < 1e-9);
        assert!((bars[1] - 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_rows_are_fixed_thirds() {
        let scene = DiskUsage::new().scene(200.0, 300.0, &[disk("a", 10, 5), disk("b", 10, 5)]);

        let glyph_tops: Vec<f64> = scene
            .elements()
            .iter()
            .filter_map(|e| match e {
                SceneElement::Glyph { y, .. } => Some(*y),
                _ => None,
            })
            .collect();
        assert_eq!(glyph_tops, vec![8.0, 108.0]);
    }
}
