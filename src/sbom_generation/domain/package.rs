use crate::shared::Result;
use std::collections::BTreeSet;
use std::fmt;

/// Maximum length for package names (security limit)
const MAX_PACKAGE_NAME_LENGTH: usize = 255;

/// Maximum length for package versions (security limit)
const MAX_VERSION_LENGTH: usize = 100;

/// Package ecosystem, the namespace in which a name/version pair is unique
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Ecosystem {
    Npm,
    Maven,
    Go,
    PyPi,
    NuGet,
    Cargo,
    RubyGems,
    /// Any ecosystem without a dedicated variant, stored lowercase
    Generic(String),
}

impl Ecosystem {
    /// Maps an upstream library type label (e.g. "javascript/Node.js",
    /// "Maven Artifact", "Python Package") onto an ecosystem.
    ///
    /// Matching is on whole words, so "pipeline" is not "pip".
    pub fn from_library_type(label: &str) -> Self {
        let lower = label.trim().to_lowercase();
        let words: Vec<&str> = lower
            .split(|c: char| !c.is_alphanumeric())
            .filter(|w| !w.is_empty())
            .collect();
        let has_any = |candidates: &[&str]| words.iter().any(|w| candidates.contains(w));

        if has_any(&["npm", "node", "nodejs", "javascript", "js", "yarn"]) {
            Ecosystem::Npm
        } else if has_any(&["maven", "java", "gradle", "jar"]) {
            Ecosystem::Maven
        } else if has_any(&["go", "golang"]) {
            Ecosystem::Go
        } else if has_any(&["python", "pypi", "pip", "wheel"]) {
            Ecosystem::PyPi
        } else if has_any(&["nuget", "net", "dotnet"]) {
            Ecosystem::NuGet
        } else if has_any(&["cargo", "rust", "crate", "crates"]) {
            Ecosystem::Cargo
        } else if has_any(&["ruby", "gem", "gems", "rubygems"]) {
            Ecosystem::RubyGems
        } else if lower.is_empty() {
            Ecosystem::Generic("generic".to_string())
        } else {
            Ecosystem::Generic(lower)
        }
    }

    /// The package-url type for this ecosystem
    pub fn purl_type(&self) -> &str {
        match self {
            Ecosystem::Npm => "npm",
            Ecosystem::Maven => "maven",
            Ecosystem::Go => "golang",
            Ecosystem::PyPi => "pypi",
            Ecosystem::NuGet => "nuget",
            Ecosystem::Cargo => "cargo",
            Ecosystem::RubyGems => "gem",
            Ecosystem::Generic(_) => "generic",
        }
    }

    /// Inverse of [`Ecosystem::purl_type`]; `generic` types keep their
    /// original label through the `generic_label` argument
    pub fn from_purl_type(purl_type: &str, generic_label: Option<&str>) -> Self {
        match purl_type {
            "npm" => Ecosystem::Npm,
            "maven" => Ecosystem::Maven,
            "golang" => Ecosystem::Go,
            "pypi" => Ecosystem::PyPi,
            "nuget" => Ecosystem::NuGet,
            "cargo" => Ecosystem::Cargo,
            "gem" => Ecosystem::RubyGems,
            other => Ecosystem::Generic(generic_label.unwrap_or(other).to_string()),
        }
    }

    /// Recovers the ecosystem from a package URL produced by [`PackageId::purl`]
    pub fn from_purl(purl: &str) -> Option<Self> {
        let rest = purl.trim().strip_prefix("pkg:")?;
        let (purl_type, remainder) = rest.split_once('/')?;
        let label = remainder
            .split_once('?')
            .and_then(|(_, qualifiers)| {
                qualifiers
                    .split('&')
                    .find_map(|pair| pair.strip_prefix("ecosystem="))
            })
            .and_then(|encoded| urlencoding::decode(encoded).ok())
            .map(|decoded| decoded.into_owned());
        Some(Self::from_purl_type(purl_type, label.as_deref()))
    }

    /// Human-readable label, also used as a stable serialization key
    pub fn label(&self) -> &str {
        match self {
            Ecosystem::Generic(label) => label,
            _ => self.purl_type(),
        }
    }
}

impl fmt::Display for Ecosystem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// NewType wrapper for package name with validation
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PackageName(String);

impl PackageName {
    pub fn new(name: String) -> Result<Self> {
        let name = name.trim().to_string();
        if name.is_empty() {
            anyhow::bail!("Package name cannot be empty");
        }

        // Security: Length limit to prevent DoS
        if name.len() > MAX_PACKAGE_NAME_LENGTH {
            anyhow::bail!(
                "Package name is too long ({} bytes). Maximum allowed: {} bytes",
                name.len(),
                MAX_PACKAGE_NAME_LENGTH
            );
        }

        if name.chars().any(char::is_control) {
            anyhow::bail!("Package name '{}' contains control characters", name.escape_debug());
        }

        Ok(Self(name))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PackageName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// NewType wrapper for package version with validation
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Version(String);

impl Version {
    pub fn new(version: String) -> Result<Self> {
        let version = version.trim().to_string();
        if version.is_empty() {
            anyhow::bail!("Package version cannot be empty");
        }

        // Security: Length limit to prevent DoS
        if version.len() > MAX_VERSION_LENGTH {
            anyhow::bail!(
                "Package version is too long ({} bytes). Maximum allowed: {} bytes",
                version.len(),
                MAX_VERSION_LENGTH
            );
        }

        if version.chars().any(char::is_control) {
            anyhow::bail!(
                "Package version '{}' contains control characters",
                version.escape_debug()
            );
        }

        Ok(Self(version))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identity key of a package: unique by (ecosystem, name, version)
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PackageId {
    ecosystem: Ecosystem,
    name: PackageName,
    version: Version,
}

impl PackageId {
    pub fn new(ecosystem: Ecosystem, name: PackageName, version: Version) -> Self {
        Self {
            ecosystem,
            name,
            version,
        }
    }

    /// Convenience constructor validating raw strings
    pub fn parse(ecosystem: Ecosystem, name: &str, version: &str) -> Result<Self> {
        Ok(Self::new(
            ecosystem,
            PackageName::new(name.to_string())?,
            Version::new(version.to_string())?,
        ))
    }

    pub fn ecosystem(&self) -> &Ecosystem {
        &self.ecosystem
    }

    pub fn name(&self) -> &str {
        self.name.as_str()
    }

    pub fn version(&self) -> &str {
        self.version.as_str()
    }

    /// Package URL (`pkg:type/name@version`) with percent-encoded segments
    pub fn purl(&self) -> String {
        let path = match self.ecosystem {
            // Maven coordinates are group:artifact, purl wants group/artifact
            Ecosystem::Maven => self
                .name()
                .split(':')
                .map(|segment| urlencoding::encode(segment).into_owned())
                .collect::<Vec<_>>()
                .join("/"),
            // Go module paths and scoped npm names keep their '/' separators
            _ => self
                .name()
                .split('/')
                .map(|segment| urlencoding::encode(segment).into_owned())
                .collect::<Vec<_>>()
                .join("/"),
        };
        let purl = format!(
            "pkg:{}/{}@{}",
            self.ecosystem.purl_type(),
            path,
            urlencoding::encode(self.version())
        );
        match &self.ecosystem {
            Ecosystem::Generic(label) => {
                format!("{}?ecosystem={}", purl, urlencoding::encode(label))
            }
            _ => purl,
        }
    }
}

impl fmt::Display for PackageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}@{}", self.ecosystem, self.name, self.version)
    }
}

/// Supported checksum algorithms
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ChecksumAlgorithm {
    Sha1,
}

impl ChecksumAlgorithm {
    pub fn spdx_name(&self) -> &'static str {
        match self {
            ChecksumAlgorithm::Sha1 => "SHA1",
        }
    }

    pub fn from_spdx_name(name: &str) -> Option<Self> {
        match name.trim().to_uppercase().replace('-', "").as_str() {
            "SHA1" => Some(ChecksumAlgorithm::Sha1),
            _ => None,
        }
    }

    fn digest_len(&self) -> usize {
        match self {
            ChecksumAlgorithm::Sha1 => 40,
        }
    }
}

/// Checksum value object; the digest is stored lowercase hex
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Checksum {
    algorithm: ChecksumAlgorithm,
    value: String,
}

impl Checksum {
    pub fn new(algorithm: ChecksumAlgorithm, value: &str) -> Result<Self> {
        let value = value.trim().to_lowercase();
        if value.len() != algorithm.digest_len() || !value.chars().all(|c| c.is_ascii_hexdigit()) {
            anyhow::bail!(
                "Invalid {} checksum '{}': expected {} hex characters",
                algorithm.spdx_name(),
                value,
                algorithm.digest_len()
            );
        }
        Ok(Self { algorithm, value })
    }

    pub fn algorithm(&self) -> ChecksumAlgorithm {
        self.algorithm
    }

    pub fn value(&self) -> &str {
        &self.value
    }
}

/// Empty or one of the SPDX placeholders for "no value"
pub fn is_unknown(value: &str) -> bool {
    let value = value.trim();
    value.is_empty()
        || value.eq_ignore_ascii_case("NONE")
        || value.eq_ignore_ascii_case("NOASSERTION")
}

/// Package entity: identity plus optional metadata
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Package {
    id: PackageId,
    licenses: BTreeSet<String>,
    checksum: Option<Checksum>,
    download_location: Option<String>,
    supplier: Option<String>,
    copyright: Option<String>,
    file_name: Option<String>,
}

impl Package {
    pub fn new(id: PackageId) -> Self {
        Self {
            id,
            licenses: BTreeSet::new(),
            checksum: None,
            download_location: None,
            supplier: None,
            copyright: None,
            file_name: None,
        }
    }

    pub fn with_license(mut self, license: impl Into<String>) -> Self {
        self.licenses.insert(license.into());
        self
    }

    pub fn with_checksum(mut self, checksum: Checksum) -> Self {
        self.checksum = Some(checksum);
        self
    }

    pub fn with_download_location(mut self, url: impl Into<String>) -> Self {
        self.download_location = Some(url.into());
        self
    }

    /// Sets the supplier name. An `Organization: ` prefix is dropped, a
    /// `Person: ` prefix is kept, and values without a name are ignored.
    pub fn with_supplier(mut self, supplier: impl Into<String>) -> Self {
        let supplier = supplier.into();
        let supplier = supplier.trim();
        let name = supplier
            .strip_prefix("Organization:")
            .unwrap_or(supplier)
            .trim();
        let named = !is_unknown(name.strip_prefix("Person:").unwrap_or(name));
        if named {
            self.supplier = Some(name.to_string());
        }
        self
    }

    /// Sets the copyright text; `NONE` and `NOASSERTION` are ignored
    pub fn with_copyright(mut self, copyright: impl Into<String>) -> Self {
        let copyright = copyright.into();
        if !is_unknown(&copyright) {
            self.copyright = Some(copyright.trim().to_string());
        }
        self
    }

    pub fn with_file_name(mut self, file_name: impl Into<String>) -> Self {
        self.file_name = Some(file_name.into());
        self
    }

    pub fn id(&self) -> &PackageId {
        &self.id
    }

    pub fn name(&self) -> &str {
        self.id.name()
    }

    pub fn version(&self) -> &str {
        self.id.version()
    }

    pub fn ecosystem(&self) -> &Ecosystem {
        self.id.ecosystem()
    }

    pub fn licenses(&self) -> &BTreeSet<String> {
        &self.licenses
    }

    pub fn checksum(&self) -> Option<&Checksum> {
        self.checksum.as_ref()
    }

    pub fn download_location(&self) -> Option<&str> {
        self.download_location.as_deref()
    }

    pub fn supplier(&self) -> Option<&str> {
        self.supplier.as_deref()
    }

    pub fn copyright(&self) -> Option<&str> {
        self.copyright.as_deref()
    }

    pub fn file_name(&self) -> Option<&str> {
        self.file_name.as_deref()
    }

    /// Merges a later-seen record of the same package into this one.
    ///
    /// Fields present on `later` replace ours, absent fields keep ours, and
    /// licenses are unioned so no license information is dropped.
    pub fn merge(&mut self, later: Package) {
        debug_assert_eq!(self.id, later.id);
        self.licenses.extend(later.licenses);
        if later.checksum.is_some() {
            self.checksum = later.checksum;
        }
        if later.download_location.is_some() {
            self.download_location = later.download_location;
        }
        if later.supplier.is_some() {
            self.supplier = later.supplier;
        }
        if later.copyright.is_some() {
            self.copyright = later.copyright;
        }
        if later.file_name.is_some() {
            self.file_name = later.file_name;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(name: &str, version: &str) -> PackageId {
        PackageId::parse(Ecosystem::Npm, name, version).unwrap()
    }

    #[test]
    fn test_package_name_new_valid() {
        let name = PackageName::new("@types/node".to_string()).unwrap();
        assert_eq!(name.as_str(), "@types/node");
    }

    #[test]
    fn test_package_name_new_empty() {
        assert!(PackageName::new("".to_string()).is_err());
        assert!(PackageName::new("   ".to_string()).is_err());
    }

    #[test]
    fn test_package_name_control_characters() {
        let result = PackageName::new("evil\nPackageName: injected".to_string());
        assert!(result.unwrap_err().to_string().contains("control characters"));
    }

    #[test]
    fn test_package_name_with_spaces() {
        let name = PackageName::new("Apache Commons Lang".to_string()).unwrap();
        assert_eq!(name.as_str(), "Apache Commons Lang");
    }

    #[test]
    fn test_package_name_too_long() {
        let result = PackageName::new("a".repeat(MAX_PACKAGE_NAME_LENGTH + 1));
        assert!(result.unwrap_err().to_string().contains("too long"));
    }

    #[test]
    fn test_version_new_valid() {
        let version = Version::new("1:2.0.0+build_1".to_string()).unwrap();
        assert_eq!(version.as_str(), "1:2.0.0+build_1");
    }

    #[test]
    fn test_version_new_empty() {
        assert!(Version::new("".to_string()).is_err());
    }

    #[test]
    fn test_version_with_spaces_and_parentheses() {
        let version = Version::new("3.6.0 (patched)".to_string()).unwrap();
        assert_eq!(version.as_str(), "3.6.0 (patched)");
        assert!(Version::new("1.0\t2".to_string()).is_err());
    }

    #[test]
    fn test_ecosystem_from_library_type() {
        assert_eq!(Ecosystem::from_library_type("javascript/Node.js"), Ecosystem::Npm);
        assert_eq!(Ecosystem::from_library_type("Maven Artifact"), Ecosystem::Maven);
        assert_eq!(Ecosystem::from_library_type("Go"), Ecosystem::Go);
        assert_eq!(Ecosystem::from_library_type("Go Module"), Ecosystem::Go);
        assert_eq!(Ecosystem::from_library_type("Python Package"), Ecosystem::PyPi);
        assert_eq!(Ecosystem::from_library_type("NuGet"), Ecosystem::NuGet);
        assert_eq!(Ecosystem::from_library_type("Rust crate"), Ecosystem::Cargo);
        assert_eq!(Ecosystem::from_library_type("Ruby Gem"), Ecosystem::RubyGems);
        assert_eq!(
            Ecosystem::from_library_type("Debian Package"),
            Ecosystem::Generic("debian package".to_string())
        );
        assert_eq!(
            Ecosystem::from_library_type(""),
            Ecosystem::Generic("generic".to_string())
        );
        assert_eq!(Ecosystem::from_library_type(".NET"), Ecosystem::NuGet);
    }

    #[test]
    fn test_ecosystem_matches_whole_words_only() {
        assert_eq!(
            Ecosystem::from_library_type("Build Pipeline"),
            Ecosystem::Generic("build pipeline".to_string())
        );
        assert_eq!(
            Ecosystem::from_library_type("Package Management"),
            Ecosystem::Generic("package management".to_string())
        );
        assert_eq!(
            Ecosystem::from_library_type("Ruby Gem"),
            Ecosystem::RubyGems
        );
    }

    #[test]
    fn test_purl_encodes_spaces() {
        let id =
            PackageId::parse(Ecosystem::Maven, "Apache Commons Lang", "3.6.0 (patched)").unwrap();
        assert!(id.purl().contains("Apache%20Commons%20Lang"));
        assert!(!id.purl().contains(' '));
    }

    #[test]
    fn test_ecosystem_purl_type_round_trip() {
        for ecosystem in [
            Ecosystem::Npm,
            Ecosystem::Maven,
            Ecosystem::Go,
            Ecosystem::PyPi,
            Ecosystem::NuGet,
            Ecosystem::Cargo,
            Ecosystem::RubyGems,
        ] {
            assert_eq!(Ecosystem::from_purl_type(ecosystem.purl_type(), None), ecosystem);
        }
        assert_eq!(
            Ecosystem::from_purl_type("generic", Some("debian package")),
            Ecosystem::Generic("debian package".to_string())
        );
    }

    #[test]
    fn test_purl_encoding() {
        let npm = PackageId::parse(Ecosystem::Npm, "@types/node", "20.1.0").unwrap();
        assert_eq!(npm.purl(), "pkg:npm/%40types/node@20.1.0");

        let maven =
            PackageId::parse(Ecosystem::Maven, "org.apache.commons:commons-lang3", "3.12.0")
                .unwrap();
        assert_eq!(maven.purl(), "pkg:maven/org.apache.commons/commons-lang3@3.12.0");

        let go = PackageId::parse(Ecosystem::Go, "github.com/pkg/errors", "v0.9.1").unwrap();
        assert_eq!(go.purl(), "pkg:golang/github.com/pkg/errors@v0.9.1");
    }

    #[test]
    fn test_generic_purl_keeps_ecosystem_label() {
        let deb = PackageId::parse(
            Ecosystem::Generic("debian package".to_string()),
            "libssl",
            "3.0.2",
        )
        .unwrap();
        let purl = deb.purl();
        assert_eq!(purl, "pkg:generic/libssl@3.0.2?ecosystem=debian%20package");
        assert_eq!(Ecosystem::from_purl(&purl), Some(deb.ecosystem().clone()));
        assert_eq!(
            Ecosystem::from_purl("pkg:npm/left-pad@1.3.0"),
            Some(Ecosystem::Npm)
        );
        assert_eq!(Ecosystem::from_purl("not a purl"), None);
    }

    #[test]
    fn test_package_id_ordering_is_total() {
        let a = id("a", "1.0");
        let b = id("b", "1.0");
        let a2 = id("a", "2.0");
        assert!(a < b);
        assert!(a < a2);
        assert_eq!(a, id("a", "1.0"));
    }

    #[test]
    fn test_checksum_validation() {
        let checksum =
            Checksum::new(ChecksumAlgorithm::Sha1, "DA39A3EE5E6B4B0D3255BFEF95601890AFD80709")
                .unwrap();
        assert_eq!(checksum.value(), "da39a3ee5e6b4b0d3255bfef95601890afd80709");
        assert!(Checksum::new(ChecksumAlgorithm::Sha1, "not-a-sha").is_err());
        assert_eq!(ChecksumAlgorithm::from_spdx_name("SHA-1"), Some(ChecksumAlgorithm::Sha1));
    }

    #[test]
    fn test_merge_last_seen_wins_and_licenses_union() {
        let mut first = Package::new(id("a", "1.0"))
            .with_license("MIT")
            .with_download_location("https://old.example")
            .with_supplier("Old Corp");
        let later = Package::new(id("a", "1.0"))
            .with_license("Apache-2.0")
            .with_download_location("https://new.example");

        first.merge(later);

        assert_eq!(first.download_location(), Some("https://new.example"));
        // absent on the later record, so the earlier value survives
        assert_eq!(first.supplier(), Some("Old Corp"));
        let licenses: Vec<&str> = first.licenses().iter().map(String::as_str).collect();
        assert_eq!(licenses, vec!["Apache-2.0", "MIT"]);
    }

    #[test]
    fn test_supplier_prefixes() {
        let person = Package::new(id("a", "1.0")).with_supplier("Person: Jane Doe");
        assert_eq!(person.supplier(), Some("Person: Jane Doe"));

        let organization = Package::new(id("a", "1.0")).with_supplier("Organization: Acme");
        assert_eq!(organization.supplier(), Some("Acme"));

        let nameless = Package::new(id("a", "1.0")).with_supplier("Person: ");
        assert_eq!(nameless.supplier(), None);
        assert_eq!(Package::new(id("a", "1.0")).with_supplier("NOASSERTION").supplier(), None);
    }

    #[test]
    fn test_copyright_placeholders_are_ignored() {
        assert_eq!(Package::new(id("a", "1.0")).with_copyright("NONE").copyright(), None);
        assert_eq!(Package::new(id("a", "1.0")).with_copyright(" ").copyright(), None);
        assert_eq!(
            Package::new(id("a", "1.0")).with_copyright("(c) 2024 Jane").copyright(),
            Some("(c) 2024 Jane")
        );
    }
}
