//! Catalog of supported variants, versions, patch chains and remotes
//!
//! The catalog is an immutable value built once (either [`Catalog::builtin`]
//! or [`Catalog::load`]) and passed explicitly to resolution and the
//! [`DataManager`](crate::DataManager).
//!
//! ```toml
//! [variants.2D_SOLVED]
//! default_version = "2.0.1"
//!
//! [variants.2D_SOLVED.versions."2"]
//!
//! [variants.2D_SOLVED.versions."2.0.1"]
//! base = "2"
//! patches = ["flip-pixel-y"]
//!
//! [remotes.2D_SOLVED_v2]
//! url = "https://zenodo.org/records/15800029/files/2D_SOLVED.zip?download=1"
//! checksum = "md5:8fd40f910b10ea1e02e4db4b57df8eb9"
//! filename = "2D_SOLVED_v2.zip"
//! folder_name = "SOLVED"
//! ```

use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;

use repair_fs::{Checksum, load_config};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::patch::{PatchId, builtin};
use crate::version::{Version, VersionRequest};
use crate::{Error, Result};

/// Solved 2D puzzles: fragment images with pixel positions
pub const VARIANT_2D_SOLVED: &str = "2D_SOLVED";
/// Solved 3D puzzles: obj/mtl/png per fragment
pub const VARIANT_3D_SOLVED: &str = "3D_SOLVED";

/// Whether the pipeline downloads and prepares data, or the caller did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Acquisition {
    #[default]
    Managed,
    Unmanaged,
}

/// One supported version of a variant.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CatalogEntry {
    /// Version whose archive is downloaded. Defaults to the entry's own version.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base: Option<Version>,

    /// Patches applied after extraction, in order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub patches: Vec<PatchId>,
}

impl CatalogEntry {
    pub fn new(base: Option<Version>, patches: Vec<PatchId>) -> Self {
        Self { base, patches }
    }

    /// The base version, falling back to `own` when none is declared.
    pub fn base_or<'a>(&'a self, own: &'a Version) -> &'a Version {
        self.base.as_ref().unwrap_or(own)
    }
}

/// The versions supported for one variant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VariantCatalog {
    pub default_version: Version,
    pub versions: BTreeMap<Version, CatalogEntry>,
}

/// Where a base archive lives and how to check it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteDescriptor {
    pub url: String,
    pub checksum: Checksum,
    /// File name of the archive inside the managed root
    pub filename: String,
    /// Top-level folder inside the archive holding the puzzles
    pub folder_name: String,
}

/// A variant paired with a concrete version.
///
/// Its string form `<variant>_v<version>` is the ledger key and the remote key.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct VariantVersion {
    variant: String,
    version: Version,
}

impl VariantVersion {
    pub fn new(variant: impl Into<String>, version: Version) -> Result<Self> {
        let variant = variant.into();
        if variant.trim().is_empty() {
            return Err(Error::MissingVariant);
        }
        Ok(Self { variant, version })
    }

    pub fn variant(&self) -> &str {
        &self.variant
    }

    pub fn version(&self) -> &Version {
        &self.version
    }

    /// Canonical key, e.g. `2D_SOLVED_v2.0.2`.
    pub fn key(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for VariantVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}_v{}", self.variant, self.version)
    }
}

/// Registry of variants and remote archives.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Catalog {
    #[serde(default)]
    pub variants: BTreeMap<String, VariantCatalog>,
    #[serde(default)]
    pub remotes: BTreeMap<String, RemoteDescriptor>,
}

impl Catalog {
    /// The catalog shipped with this crate.
    pub fn builtin() -> Self {
        let v = |s: &str| Version::parse(s).expect("builtin catalog version literals parse");
        let v2 = v("2");

        let mut solved_2d = BTreeMap::new();
        solved_2d.insert(v2.clone(), CatalogEntry::default());
        solved_2d.insert(
            v("2.0.1"),
            CatalogEntry::new(Some(v2.clone()), vec![PatchId::from(builtin::FLIP_PIXEL_Y)]),
        );
        solved_2d.insert(
            v("2.0.2"),
            CatalogEntry::new(
                Some(v2.clone()),
                vec![
                    PatchId::from(builtin::FLIP_PIXEL_Y),
                    PatchId::from(builtin::OBJ_TO_PNG),
                ],
            ),
        );
        solved_2d.insert(
            v("2.5b"),
            CatalogEntry::new(Some(v2.clone()), vec![PatchId::from(builtin::CROP_TO_OPAQUE)]),
        );
        solved_2d.insert(
            v("3-beta"),
            CatalogEntry::new(Some(v2.clone()), vec![PatchId::from(builtin::V3_BETA)]),
        );

        let mut solved_3d = BTreeMap::new();
        solved_3d.insert(v2.clone(), CatalogEntry::default());

        let mut variants = BTreeMap::new();
        variants.insert(
            VARIANT_2D_SOLVED.to_string(),
            VariantCatalog {
                default_version: v("2.0.1"),
                versions: solved_2d,
            },
        );
        variants.insert(
            VARIANT_3D_SOLVED.to_string(),
            VariantCatalog {
                default_version: v2,
                versions: solved_3d,
            },
        );

        let checksum = |s: &str| {
            Checksum::parse(s).expect("builtin catalog checksums are well-formed sha256 literals")
        };

        let mut remotes = BTreeMap::new();
        remotes.insert(
            "2D_SOLVED_v2".to_string(),
            RemoteDescriptor {
                url: "https://zenodo.org/records/15800029/files/2D_SOLVED.zip?download=1".into(),
                checksum: checksum("md5:8fd40f910b10ea1e02e4db4b57df8eb9"),
                filename: "2D_SOLVED_v2.zip".into(),
                folder_name: "SOLVED".into(),
            },
        );
        remotes.insert(
            "3D_SOLVED_v2".to_string(),
            RemoteDescriptor {
                url: "https://zenodo.org/records/15800029/files/3D_SOLVED.zip?download=1".into(),
                checksum: checksum("md5:8bfa13e1d5de5528cda22c72a47103e8"),
                filename: "3D_SOLVED_v2.zip".into(),
                folder_name: "SOLVED".into(),
            },
        );

        Self { variants, remotes }
    }

    /// Load a catalog from a TOML, JSON or YAML file and validate it.
    pub fn load(path: &Path) -> Result<Self> {
        let catalog: Self = load_config(path)?;
        catalog.validate()?;
        debug!(path = %path.display(), variants = catalog.variants.len(), "Loaded catalog");
        Ok(catalog)
    }

    /// Check structural invariants.
    ///
    /// Every variant name is non-empty, lists at least one version, and its
    /// default version is one of its listed versions.
    pub fn validate(&self) -> Result<()> {
        for (name, variant) in &self.variants {
            if name.trim().is_empty() {
                return Err(Error::InvalidCatalog {
                    message: "variant names must not be empty".into(),
                });
            }
            if variant.versions.is_empty() {
                return Err(Error::InvalidCatalog {
                    message: format!("variant '{name}' lists no versions"),
                });
            }
            if !variant.versions.contains_key(&variant.default_version) {
                return Err(Error::InvalidCatalog {
                    message: format!(
                        "default version {} of variant '{name}' is not a listed version",
                        variant.default_version
                    ),
                });
            }
        }
        Ok(())
    }

    /// Supported variant names, sorted.
    pub fn variant_names(&self) -> Vec<String> {
        self.variants.keys().cloned().collect()
    }

    pub fn variant(&self, name: &str) -> Result<&VariantCatalog> {
        if name.trim().is_empty() {
            return Err(Error::MissingVariant);
        }
        self.variants.get(name).ok_or_else(|| Error::UnknownVariant {
            variant: name.to_string(),
            supported: self.variant_names(),
        })
    }

    /// Resolve a request to the single concrete version to use.
    ///
    /// An empty request picks the variant default, which is only allowed for
    /// managed acquisition. Otherwise the greatest listed version matching the
    /// request wins.
    pub fn resolve(
        &self,
        variant: &str,
        request: &VersionRequest,
        acquisition: Acquisition,
    ) -> Result<VariantVersion> {
        let catalog = self.variant(variant)?;

        let requested = match request.to_version()? {
            Some(version) => version,
            None => match acquisition {
                Acquisition::Managed => catalog.default_version.clone(),
                Acquisition::Unmanaged => {
                    return Err(Error::VersionRequired {
                        variant: variant.to_string(),
                    });
                }
            },
        };

        let matched = catalog
            .versions
            .keys()
            .filter(|candidate| requested.matches(candidate))
            .max()
            .ok_or_else(|| Error::UnsupportedVersion {
                variant: variant.to_string(),
                requested: requested.to_string(),
                supported: catalog.versions.keys().map(|v| v.to_string()).collect(),
            })?;

        debug!(%variant, %requested, resolved = %matched, "Resolved dataset version");
        VariantVersion::new(variant, matched.clone())
    }

    /// The catalog entry of a resolved version.
    pub fn entry(&self, target: &VariantVersion) -> Result<&CatalogEntry> {
        let catalog = self.variant(target.variant())?;
        catalog
            .versions
            .get(target.version())
            .ok_or_else(|| Error::UnsupportedVersion {
                variant: target.variant().to_string(),
                requested: target.version().to_string(),
                supported: catalog.versions.keys().map(|v| v.to_string()).collect(),
            })
    }

    /// The remote archive backing a resolved version, keyed by `<variant>_v<base>`.
    pub fn remote_for(&self, target: &VariantVersion) -> Result<&RemoteDescriptor> {
        let entry = self.entry(target)?;
        let base = entry.base_or(target.version());
        let key = format!("{}_v{}", target.variant(), base);
        self.remotes.get(&key).ok_or_else(|| Error::MissingRemote {
            variant: target.variant().to_string(),
            base: base.to_string(),
        })
    }
}
