//! Integration tests for types crate

#[cfg(test)]
mod tests {
    use ferry_types::*;

    #[test]
    fn test_platform_serialization() {
        let json = serde_json::to_string(&Platform::MacOs).unwrap();
        assert_eq!(json, "\"macos\"");
        let parsed: Platform = serde_json::from_str("\"linux\"").unwrap();
        assert_eq!(parsed, Platform::Linux);
    }

    #[test]
    fn test_stage_serialization() {
        let json = serde_json::to_string(&Stage::Uploading).unwrap();
        assert_eq!(json, "\"uploading\"");
    }

    #[test]
    fn test_archive_file_name() {
        let archive = ArchiveArtifact::new("/work/Build.zip");
        assert_eq!(archive.file_name(), "Build.zip");
        assert_eq!(archive.path(), std::path::Path::new("/work/Build.zip"));
    }

    #[test]
    fn test_request_accessors() {
        let request = BuildRequest::new("7", "Host", "d", "c", "2.0.0", "a", "MIT");
        assert_eq!(request.recipient(), "7");
        assert_eq!(request.version(), "2.0.0");
        assert_eq!(request.manifest_replacements()[0].1, "Host");
    }
}
