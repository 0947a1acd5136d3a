//! Volume record to size sample conversion.

use deepsea_api::Volume;

/// Bytes in one provider gigabyte (a gibibyte).
pub const BYTES_PER_GIGABYTE: f64 = 1_073_741_824.0;

/// Label schema of the size gauge.
pub const SIZE_LABELS: [&str; 3] = ["id", "name", "region"];

/// One volume's size series.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VolumeSample<'a> {
    /// Values for [`SIZE_LABELS`], in that order.
    pub label_values: [&'a str; 3],
    pub bytes: f64,
}

/// Size in bytes of a volume reported in gigabytes.
pub fn size_bytes(size_gigabytes: i64) -> f64 {
    size_gigabytes as f64 * BYTES_PER_GIGABYTE
}

/// The size sample of a volume.
///
/// Empty fields become empty label values; no volume is skipped.
pub fn volume_sample(volume: &Volume) -> VolumeSample<'_> {
    VolumeSample {
        label_values: [&volume.id, &volume.name, volume.region_slug()],
        bytes: size_bytes(volume.size_gigabytes),
    }
}
