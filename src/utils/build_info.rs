/// Compile-time build metadata produced by `build.rs`.
#[derive(Debug, Clone, Copy)]
pub struct BuildMetadata {
    pub version: &'static str,
    pub git_hash: &'static str,
    pub timestamp: &'static str,
    pub profile: &'static str,
}

/// Returns the statically-embedded build metadata.
pub fn current() -> BuildMetadata {
    BuildMetadata {
        version: env!("CARGO_PKG_VERSION"),
        git_hash: option_env!("DONATION_DESK_BUILD_HASH").unwrap_or("unknown"),
        timestamp: option_env!("DONATION_DESK_BUILD_TIMESTAMP").unwrap_or("unknown"),
        profile: option_env!("DONATION_DESK_BUILD_PROFILE").unwrap_or("unknown"),
    }
}

impl BuildMetadata {
    pub fn summary(&self) -> String {
        format!(
            "donation_desk {} ({} {}, built {})",
            self.version, self.git_hash, self.profile, self.timestamp
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn summary_mentions_package_version() {
        assert!(current().summary().contains(env!("CARGO_PKG_VERSION")));
    }
}
