use voxscribe::domain::{SanitizedFilename, StoragePath, UploadId};

#[test]
fn given_upload_id_and_filename_when_creating_path_then_format_is_uuid_underscore_filename() {
    let id = UploadId::new();
    let path = StoragePath::new(&id, &SanitizedFilename::new("lecture.wav"));

    let expected = format!("{}_lecture.wav", id.as_uuid());
    assert_eq!(path.as_str(), expected);
}

#[test]
fn given_two_uploads_with_same_name_when_creating_paths_then_paths_differ() {
    let name = SanitizedFilename::new("clip.wav");

    let path_a = StoragePath::new(&UploadId::new(), &name);
    let path_b = StoragePath::new(&UploadId::new(), &name);

    assert_ne!(path_a, path_b);
}

#[test]
fn given_storage_path_when_displayed_then_matches_as_str() {
    let path = StoragePath::new(&UploadId::new(), &SanitizedFilename::new("test.wav"));

    assert_eq!(format!("{}", path), path.as_str());
}

#[test]
fn given_traversal_filename_when_creating_path_then_path_is_a_single_component() {
    let path = StoragePath::new(
        &UploadId::new(),
        &SanitizedFilename::new("../../secret.wav"),
    );

    assert!(!path.as_str().contains('/'));
    assert!(path.as_str().ends_with("_secret.wav"));
}
