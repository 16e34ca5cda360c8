//! Attachment resolution: image parts become numbered JPEG assets and body
//! substitutions.

use std::path::Path;

use crate::error::Result;
use crate::model::envelope::{Envelope, PartOrigin};
use crate::model::post::{AssetRef, Placement, Slug};

use super::normalize::{normalize_image, EXTENSION, MAX_DIMENSION};
use super::write_file;

/// Repository directory holding post assets.
pub const ASSETS_DIR: &str = "assets";

/// Repository-relative path of the `sequence`-th asset of a post.
pub fn asset_path(slug: &Slug, sequence: usize) -> String {
    format!("{ASSETS_DIR}/{slug}-{sequence:03}.{EXTENSION}")
}

/// Normalize and write every image part of `envelope` below `root`.
///
/// Parts are visited inline-first, then others, in MIME order. Only
/// `image/*` parts are written and numbered; the numbering starts at 1 and
/// is shared by both groups. Inline images get a `[image: <filename>]`
/// replacement rule, other images are appended after the body. A part's
/// Content-ID is kept so `cid:` references can be pointed at the asset. The first
/// decode, encode or write failure aborts the whole resolution.
pub fn resolve_attachments(envelope: &Envelope, slug: &Slug, root: &Path) -> Result<Vec<AssetRef>> {
    let images = envelope.parts().filter(|(_, part)| {
        if !part.is_image() {
            tracing::warn!(
                content_type = %part.content_type,
                filename = part.display_name(),
                "Skipping non-image part"
            );
        }
        part.is_image()
    });

    let mut assets = Vec::new();
    for ((origin, part), sequence) in images.zip(1..) {
        let path = asset_path(slug, sequence);
        let filename = part.display_name().to_string();

        let jpeg = normalize_image(&filename, &part.content, MAX_DIMENSION)?;
        write_file(root, &path, &jpeg)?;

        let placement = match origin {
            PartOrigin::Inline => Placement::Replace {
                marker: format!("[image: {filename}]"),
            },
            PartOrigin::Other => Placement::Append,
        };
        tracing::info!(path = %path, filename = %filename, ?placement, "Wrote asset");

        assets.push(AssetRef {
            path,
            filename,
            sequence,
            placement,
            content_id: part.content_id.clone(),
        });
    }
    Ok(assets)
}

/// Apply asset placements to `body`: replacements first, then appended
/// image lines in sequence order, each followed by a blank line.
///
/// A replacement whose marker does not occur leaves the body unchanged.
/// Markdown image targets of the form `(cid:<id>)`, as produced from HTML
/// bodies, are rewritten to the asset carrying that Content-ID.
pub fn apply_assets(body: &str, assets: &[AssetRef]) -> String {
    let mut out = body.to_string();
    for asset in assets {
        if let Placement::Replace { marker } = &asset.placement {
            out = out.replace(marker.as_str(), &asset.markdown());
        }
        if let Some(id) = asset.content_id.as_deref().filter(|id| !id.is_empty()) {
            out = out.replace(&format!("](cid:{id})"), &format!("](/{})", asset.path));
        }
    }
    for asset in assets {
        if asset.placement == Placement::Append {
            out.push_str(&asset.markdown());
            out.push_str("\n\n");
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::MoblogError;
    use crate::model::envelope::Part;
    use crate::pipeline::slug::derive_slug;
    use crate::pipeline::testutil::encoded_image;
    use image::ImageFormat;

    fn part(content_type: &str, filename: &str, content: Vec<u8>) -> Part {
        Part {
            content_type: content_type.to_string(),
            content,
            filename: Some(filename.to_string()),
            content_id: None,
        }
    }

    fn png() -> Vec<u8> {
        encoded_image(20, 10, ImageFormat::Png)
    }

    #[test]
    fn test_asset_path_zero_padded() {
        let slug = derive_slug("x");
        assert_eq!(asset_path(&slug, 1), format!("assets/{slug}-001.jpg"));
        assert_eq!(asset_path(&slug, 42), format!("assets/{slug}-042.jpg"));
    }

    #[test]
    fn test_sequence_shared_and_non_images_skipped() {
        let dir = tempfile::tempdir().unwrap();
        let slug = derive_slug("Trip");
        let envelope = Envelope {
            inlines: vec![
                Part {
                    content_id: Some("photo@local".to_string()),
                    ..part("image/png", "photo.png", png())
                },
                part("text/calendar", "invite.ics", b"BEGIN".to_vec()),
            ],
            others: vec![
                part("application/pdf", "doc.pdf", b"%PDF".to_vec()),
                part("image/gif", "extra.gif", encoded_image(5, 5, ImageFormat::Gif)),
            ],
            ..Default::default()
        };

        let assets = resolve_attachments(&envelope, &slug, dir.path()).unwrap();
        assert_eq!(assets.len(), 2);
        assert_eq!(assets[0].sequence, 1);
        assert_eq!(assets[0].path, format!("assets/{slug}-001.jpg"));
        assert_eq!(assets[0].content_id.as_deref(), Some("photo@local"));
        assert_eq!(
            assets[0].placement,
            Placement::Replace {
                marker: "[image: photo.png]".to_string()
            }
        );
        assert_eq!(assets[1].sequence, 2);
        assert_eq!(assets[1].path, format!("assets/{slug}-002.jpg"));
        assert_eq!(assets[1].placement, Placement::Append);

        for asset in &assets {
            let written = std::fs::read(dir.path().join(&asset.path)).unwrap();
            assert_eq!(image::guess_format(&written).unwrap(), ImageFormat::Jpeg);
        }
        let files = std::fs::read_dir(dir.path().join(ASSETS_DIR)).unwrap().count();
        assert_eq!(files, 2);
    }

    #[test]
    fn test_undecodable_image_aborts() {
        let dir = tempfile::tempdir().unwrap();
        let envelope = Envelope {
            others: vec![part("image/png", "bad.png", b"garbage".to_vec())],
            ..Default::default()
        };
        let err = resolve_attachments(&envelope, &derive_slug("s"), dir.path()).unwrap_err();
        assert!(matches!(err, MoblogError::ImageDecode { .. }));
    }

    #[test]
    fn test_no_parts_no_assets() {
        let dir = tempfile::tempdir().unwrap();
        let assets = resolve_attachments(&Envelope::default(), &derive_slug("s"), dir.path()).unwrap();
        assert!(assets.is_empty());
        assert!(!dir.path().join(ASSETS_DIR).exists());
    }

    fn inline(path: &str, name: &str) -> AssetRef {
        AssetRef {
            path: path.to_string(),
            filename: name.to_string(),
            sequence: 1,
            placement: Placement::Replace {
                marker: format!("[image: {name}]"),
            },
            content_id: None,
        }
    }

    fn appended(path: &str, name: &str, sequence: usize) -> AssetRef {
        AssetRef {
            path: path.to_string(),
            filename: name.to_string(),
            sequence,
            placement: Placement::Append,
            content_id: None,
        }
    }

    #[test]
    fn test_apply_replaces_every_marker() {
        let body = "a [image: photo.png] b [image: photo.png]\n\n";
        let out = apply_assets(body, &[inline("assets/s-001.jpg", "photo.png")]);
        assert_eq!(
            out,
            "a ![photo.png](/assets/s-001.jpg) b ![photo.png](/assets/s-001.jpg)\n\n"
        );
    }

    #[test]
    fn test_apply_missing_marker_is_noop() {
        let body = "no markers here\n\n";
        assert_eq!(apply_assets(body, &[inline("assets/s-001.jpg", "photo.png")]), body);
    }

    #[test]
    fn test_apply_appends_after_body() {
        let body = "text [image: photo.png]\n\n";
        let out = apply_assets(
            body,
            &[
                inline("assets/s-001.jpg", "photo.png"),
                appended("assets/s-002.jpg", "extra.gif", 2),
                appended("assets/s-003.jpg", "more.jpg", 3),
            ],
        );
        assert_eq!(
            out,
            "text ![photo.png](/assets/s-001.jpg)\n\n\
             ![extra.gif](/assets/s-002.jpg)\n\n\
             ![more.jpg](/assets/s-003.jpg)\n\n"
        );
    }

    #[test]
    fn test_apply_rewrites_cid_references() {
        let body = "See ![photo.png](cid:photo@local) and [cid:photo@local]\n\n";
        let asset = AssetRef {
            content_id: Some("photo@local".to_string()),
            ..inline("assets/s-001.jpg", "photo.png")
        };
        assert_eq!(
            apply_assets(body, &[asset]),
            "See ![photo.png](/assets/s-001.jpg) and [cid:photo@local]\n\n"
        );
        // Unknown ids are left alone.
        let other = AssetRef {
            content_id: Some("other@local".to_string()),
            ..inline("assets/s-001.jpg", "photo.png")
        };
        assert_eq!(apply_assets(body, &[other]), body);
    }
}
