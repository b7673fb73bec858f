use std::collections::{BTreeMap, BTreeSet};
use std::sync::OnceLock;

use regex::Regex;
use rsym_core::{AssetKind, Diagnostics, ImageFileRecord, MediaAssetRecord, SymbolLeaf, SymbolNode};
use tracing::trace;

use crate::builders::{quote, BuildContext, SymbolBuilder};

pub struct MediaBuilder<'a> {
    kind: AssetKind,
    assets: &'a [MediaAssetRecord],
    image_files: &'a [ImageFileRecord],
}

impl<'a> MediaBuilder<'a> {
    pub fn images(assets: &'a [MediaAssetRecord], image_files: &'a [ImageFileRecord]) -> Self {
        Self {
            kind: AssetKind::Image,
            assets,
            image_files,
        }
    }

    pub fn colors(assets: &'a [MediaAssetRecord]) -> Self {
        Self {
            kind: AssetKind::Color,
            assets,
            image_files: &[],
        }
    }

    pub fn data(assets: &'a [MediaAssetRecord]) -> Self {
        Self {
            kind: AssetKind::Data,
            assets,
            image_files: &[],
        }
    }

    fn resource_type(&self) -> &'static str {
        match self.kind {
            AssetKind::Image => "ImageResource",
            AssetKind::Color => "ColorResource",
            AssetKind::Data => "DataResource",
        }
    }

    fn entries(&self, diagnostics: &mut Diagnostics) -> Vec<MediaEntry> {
        let mut entries = self
            .assets
            .iter()
            .filter(|asset| asset.kind == self.kind)
            .map(|asset| MediaEntry {
                path: asset.namespace.clone(),
                name: asset.name.clone(),
                full_name: asset.full_name(),
            })
            .collect::<Vec<_>>();

        let mut loose = BTreeSet::new();
        for file in self.image_files {
            let Some(name) = image_name_from_file(&file.file_name) else {
                diagnostics.warn(
                    "IMAGE_FILE_UNSUPPORTED",
                    format!("Skipping image file '{}', unsupported extension", file.file_name),
                );
                continue;
            };
            if loose.insert(name.clone()) {
                entries.push(MediaEntry {
                    path: Vec::new(),
                    full_name: name.clone(),
                    name,
                });
            }
        }
        entries
    }

    fn build_level(
        &self,
        name: &str,
        scope: &str,
        entries: Vec<&MediaEntry>,
        depth: usize,
        context: &BuildContext<'_>,
        diagnostics: &mut Diagnostics,
    ) -> SymbolNode {
        let mut node = SymbolNode::new(name);
        let mut items = Vec::new();
        let mut folders: BTreeMap<&str, Vec<&MediaEntry>> = BTreeMap::new();
        for entry in entries {
            match entry.path.get(depth) {
                Some(folder) => folders.entry(folder.as_str()).or_default().push(entry),
                None => items.push(MediaItem::Asset(entry)),
            }
        }
        items.extend(
            folders
                .into_iter()
                .map(|(folder, entries)| MediaItem::Folder(folder, entries)),
        );

        let grouped = context.sanitizer.group(items, |item| match item {
            MediaItem::Asset(entry) => entry.name.clone(),
            MediaItem::Folder(folder, _) => (*folder).to_string(),
        });
        grouped.report(self.kind_label(), scope, diagnostics);

        for unique in grouped.uniques {
            match unique.item {
                MediaItem::Asset(entry) => {
                    trace!(asset = %entry.full_name, "media leaf");
                    node.leaves.push(SymbolLeaf::constant(
                        &unique.identifier,
                        self.resource_type(),
                        format!(
                            "{}(name: {}, bundle: {})",
                            self.resource_type(),
                            quote(&entry.full_name),
                            context.bundle()
                        ),
                    ));
                }
                MediaItem::Folder(folder, entries) => {
                    let scope = format!("{}/{}", scope, folder);
                    node.children.push(self.build_level(
                        &unique.identifier,
                        &scope,
                        entries,
                        depth + 1,
                        context,
                        diagnostics,
                    ));
                }
            }
        }
        node
    }

    fn kind_label(&self) -> &'static str {
        match self.kind {
            AssetKind::Image => "images",
            AssetKind::Color => "colors",
            AssetKind::Data => "data assets",
        }
    }
}

impl SymbolBuilder for MediaBuilder<'_> {
    fn namespace(&self) -> &str {
        match self.kind {
            AssetKind::Image => "image",
            AssetKind::Color => "color",
            AssetKind::Data => "data",
        }
    }

    fn build(&self, context: &BuildContext<'_>, diagnostics: &mut Diagnostics) -> SymbolNode {
        let entries = self.entries(diagnostics);
        self.build_level(
            self.namespace(),
            self.namespace(),
            entries.iter().collect(),
            0,
            context,
            diagnostics,
        )
    }
}

#[derive(Debug)]
struct MediaEntry {
    path: Vec<String>,
    name: String,
    full_name: String,
}

enum MediaItem<'e> {
    Asset(&'e MediaEntry),
    Folder(&'e str, Vec<&'e MediaEntry>),
}

/// `icon@2x~ipad.png` -> `icon`; `None` when the extension is not an image format.
fn image_name_from_file(file_name: &str) -> Option<String> {
    image_file_regex()
        .captures(file_name)
        .and_then(|caps| caps.get(1))
        .map(|name| name.as_str().to_string())
}

fn image_file_regex() -> &'static Regex {
    static REGEX: OnceLock<Regex> = OnceLock::new();
    REGEX.get_or_init(|| {
        Regex::new(
            r"(?i)^(.+?)(?:@[0-9]+x)?(?:~(?:iphone|ipad|mac|tv|watch))?\.(?:png|jpe?g|gif|bmp|tiff?|heic|pdf|ico|cur|xbm)$",
        )
        .expect("image file regex must compile")
    })
}
