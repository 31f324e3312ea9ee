//! Embedded-metadata writing for exported photos.
//!
//! EXIF tags (GPS position, capture time, title) are written with
//! `little_exif`; title and keywords additionally go into an XMP packet for
//! JPEG files. Writing is best-effort per field: a value that cannot be
//! converted is skipped, not fatal.

use std::path::Path;

use chrono::{DateTime, Utc};
use little_exif::exif_tag::ExifTag;
use little_exif::metadata::Metadata;
use little_exif::rational::uR64;
use phototag_types::{Error, PhotoRecord, Result};

/// Fully-resolved field set handed to the writer at export time.
#[derive(Debug, Clone, Default)]
pub struct ExportFields {
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub altitude: Option<f64>,
    pub capture_time: Option<DateTime<Utc>>,
    pub offset_time: Option<String>,
    pub title: Option<String>,
    pub keywords: Option<String>,
}

impl ExportFields {
    /// Collect the resolved values of a ledger record: final coordinates,
    /// override time over embedded time, overlay strings over embedded ones.
    pub fn from_record(record: &PhotoRecord) -> Self {
        let location = record.final_location();
        Self {
            latitude: location.map(|p| p.latitude),
            longitude: location.map(|p| p.longitude),
            altitude: location.and_then(|p| p.altitude),
            capture_time: record.export_time(),
            offset_time: record.export_offset_time().map(str::to_string),
            title: record.export_title().map(str::to_string),
            keywords: record.export_keywords().map(str::to_string),
        }
    }

    fn has_xmp_data(&self) -> bool {
        self.title.is_some() || self.keywords.is_some()
    }
}

/// Rewrite the embedded metadata of an exported file in place.
///
/// Pixel data is untouched. Existing EXIF is preserved where possible; files
/// without a readable EXIF block only receive the XMP packet (little_exif
/// cannot safely create a block from scratch in every container).
pub fn write_metadata(path: &Path, fields: &ExportFields) -> Result<()> {
    let mut wrote_anything = false;

    match Metadata::new_from_path(path) {
        Ok(mut metadata) => {
            set_exif_tags(&mut metadata, fields);
            metadata.write_to_file(path).map_err(|e| {
                Error::Io(std::io::Error::new(
                    std::io::ErrorKind::Other,
                    format!("failed to write EXIF metadata to {}: {e:?}", path.display()),
                ))
            })?;
            wrote_anything = true;
        }
        Err(e) => {
            tracing::warn!(
                path = %path.display(),
                "no readable EXIF block, skipping EXIF write: {e:?}"
            );
        }
    }

    if fields.has_xmp_data() && is_jpeg(path) {
        write_xmp_packet(path, fields)?;
        wrote_anything = true;
    }

    if wrote_anything {
        Ok(())
    } else {
        Err(Error::Validation(format!(
            "no metadata could be written to {}",
            path.display()
        )))
    }
}

fn is_jpeg(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| e.eq_ignore_ascii_case("jpg") || e.eq_ignore_ascii_case("jpeg"))
        .unwrap_or(false)
}

fn set_exif_tags(metadata: &mut Metadata, fields: &ExportFields) {
    if let (Some(latitude), Some(longitude)) = (fields.latitude, fields.longitude) {
        let latitude_ref = if latitude >= 0.0 { "N" } else { "S" };
        metadata.set_tag(ExifTag::GPSLatitudeRef(latitude_ref.to_string()));
        metadata.set_tag(ExifTag::GPSLatitude(decimal_to_dms(latitude.abs())));

        let longitude_ref = if longitude >= 0.0 { "E" } else { "W" };
        metadata.set_tag(ExifTag::GPSLongitudeRef(longitude_ref.to_string()));
        metadata.set_tag(ExifTag::GPSLongitude(decimal_to_dms(longitude.abs())));

        if let Some(altitude) = fields.altitude {
            metadata.set_tag(ExifTag::GPSAltitudeRef(vec![u8::from(altitude < 0.0)]));
            metadata.set_tag(ExifTag::GPSAltitude(vec![uR64 {
                nominator: (altitude.abs() * 100.0).round() as u32,
                denominator: 100,
            }]));
        }
    }

    if let Some(capture_time) = fields.capture_time {
        let formatted = capture_time.format("%Y:%m:%d %H:%M:%S").to_string();
        metadata.set_tag(ExifTag::DateTimeOriginal(formatted.clone()));
        metadata.set_tag(ExifTag::CreateDate(formatted));
    }

    if let Some(title) = &fields.title {
        metadata.set_tag(ExifTag::ImageDescription(title.clone()));
    }
}

/// Decimal degrees to EXIF degree/minute/second rationals.
fn decimal_to_dms(decimal: f64) -> Vec<uR64> {
    let degrees = decimal.floor();
    let minutes_decimal = (decimal - degrees) * 60.0;
    let minutes = minutes_decimal.floor();
    let seconds = (minutes_decimal - minutes) * 60.0;

    vec![
        uR64 {
            nominator: degrees as u32,
            denominator: 1,
        },
        uR64 {
            nominator: minutes as u32,
            denominator: 1,
        },
        uR64 {
            nominator: (seconds * 100.0).round() as u32,
            denominator: 100,
        },
    ]
}

/// XMP namespace marker of a JPEG APP1 segment.
const XMP_MARKER: &[u8] = b"http://ns.adobe.com/xap/1.0/\0";

/// Embed (or replace) the XMP packet of a JPEG file.
fn write_xmp_packet(path: &Path, fields: &ExportFields) -> Result<()> {
    let packet = build_xmp_document(fields);
    let segment = build_xmp_segment(&packet)?;

    let data = std::fs::read(path)?;
    if data.len() < 2 || data[0] != 0xFF || data[1] != 0xD8 {
        return Err(Error::Validation(format!(
            "{} is not a valid JPEG file",
            path.display()
        )));
    }

    let placement = locate_xmp_segment(&data)?;
    let rewritten = match placement {
        XmpPlacement::Replace { start, end } => {
            let mut out = Vec::with_capacity(data.len() - (end - start) + segment.len());
            out.extend_from_slice(&data[..start]);
            out.extend_from_slice(&segment);
            out.extend_from_slice(&data[end..]);
            out
        }
        XmpPlacement::InsertAt(position) => {
            let mut out = Vec::with_capacity(data.len() + segment.len());
            out.extend_from_slice(&data[..position]);
            out.extend_from_slice(&segment);
            out.extend_from_slice(&data[position..]);
            out
        }
    };

    std::fs::write(path, rewritten)?;
    Ok(())
}

fn build_xmp_document(fields: &ExportFields) -> Vec<u8> {
    use xmp_writer::XmpWriter;

    let mut writer = XmpWriter::new();
    if let Some(title) = &fields.title {
        writer.title([(None, title.as_str())]);
    }
    if let Some(keywords) = &fields.keywords {
        let subjects: Vec<&str> = keywords
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .collect();
        if !subjects.is_empty() {
            writer.subject(subjects);
        }
    }
    writer.finish(None).into_bytes()
}

enum XmpPlacement {
    Replace { start: usize, end: usize },
    InsertAt(usize),
}

/// Walk the JPEG segment chain looking for an existing XMP APP1 segment;
/// otherwise report where a new one belongs (after the first APP segment).
fn locate_xmp_segment(data: &[u8]) -> Result<XmpPlacement> {
    let mut position = 2; // past SOI
    let mut first_app_end = 2;

    while position + 4 <= data.len() {
        if data[position] != 0xFF {
            return Err(Error::Validation("invalid JPEG structure".to_string()));
        }

        let marker = data[position + 1];
        match marker {
            0xD9 | 0xDA => break, // EOI / start of scan data
            0xD8 | 0x00 => {
                position += 2;
                continue;
            }
            _ if (0xD0..=0xD7).contains(&marker) => {
                position += 2;
                continue;
            }
            _ => {
                let length = u16::from_be_bytes([data[position + 2], data[position + 3]]) as usize;
                let segment_end = position + 2 + length;
                if segment_end > data.len() {
                    break;
                }

                if marker == 0xE1 {
                    let payload = position + 4;
                    if payload + XMP_MARKER.len() <= segment_end
                        && &data[payload..payload + XMP_MARKER.len()] == XMP_MARKER
                    {
                        return Ok(XmpPlacement::Replace {
                            start: position,
                            end: segment_end,
                        });
                    }
                }

                if (0xE0..=0xEF).contains(&marker) && first_app_end == 2 {
                    first_app_end = segment_end;
                }
                position = segment_end;
            }
        }
    }

    Ok(XmpPlacement::InsertAt(first_app_end))
}

fn build_xmp_segment(packet: &[u8]) -> Result<Vec<u8>> {
    let payload_length = 2 + XMP_MARKER.len() + packet.len();
    if payload_length > 0xFFFF {
        return Err(Error::Validation(
            "XMP packet too large for a JPEG APP1 segment".to_string(),
        ));
    }

    let mut segment = Vec::with_capacity(2 + payload_length);
    segment.push(0xFF);
    segment.push(0xE1);
    segment.extend_from_slice(&(payload_length as u16).to_be_bytes());
    segment.extend_from_slice(XMP_MARKER);
    segment.extend_from_slice(packet);
    Ok(segment)
}
