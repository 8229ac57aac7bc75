//! End-to-end runs over a temporary library.
//!
//! These tests drive `RunCoordinator` with the real processor and check:
//! - Cover normalization and its idempotence
//! - Renaming, collisions and folder renaming
//! - Backups and dry runs leaving originals intact
//! - Per-file failure isolation

mod common;

use std::collections::BTreeSet;
use std::fs;

use common::{read_tags, Library};
use coverkit_core::{
    testing::fixtures, CoverChange, CoverImage, ErrorKind, ImageKind, JobOutcome, RunMode, SkipReason,
    TagPatch,
};

fn cover_change(outcome: &JobOutcome) -> CoverChange {
    match outcome {
        JobOutcome::Success(changes) => changes.cover,
        other => panic!("expected success, got {:?}", other),
    }
}

#[tokio::test]
async fn test_embed_twice_second_run_unchanged() {
    let lib = Library::new();
    let song = lib.mp3(
        "song.mp3",
        Some(1),
        Some("Song"),
        Some("Album"),
        Some(CoverImage::from_bytes(fixtures::png_bytes(300, 200))),
    );

    let first = lib.run(lib.config(RunMode::EmbedOnly)).await;
    assert_eq!(first.succeeded, 1);
    assert_eq!(cover_change(&first.files[0].outcome), CoverChange::Replaced);

    let cover = read_tags(&song).cover.expect("cover embedded");
    assert_eq!(cover.kind, ImageKind::Jpeg);
    assert_eq!(cover.dimensions, Some((600, 600)));

    let after_first = fs::read(&song).unwrap();
    let second = lib.run(lib.config(RunMode::EmbedOnly)).await;
    assert_eq!(cover_change(&second.files[0].outcome), CoverChange::Unchanged);
    assert_eq!(fs::read(&song).unwrap(), after_first);
}

/// Embeds twice and checks the second run leaves the file byte-identical.
async fn assert_embed_is_idempotent(lib: &Library, file: &std::path::Path) {
    let first = lib.run(lib.config(RunMode::EmbedOnly)).await;
    assert_eq!(first.succeeded, 1);
    assert_eq!(cover_change(&first.files[0].outcome), CoverChange::Replaced);

    let cover = read_tags(file).cover.expect("cover embedded");
    assert_eq!(cover.kind, ImageKind::Jpeg);
    assert_eq!(cover.dimensions, Some((600, 600)));

    let after_first = fs::read(file).unwrap();
    let second = lib.run(lib.config(RunMode::EmbedOnly)).await;
    assert_eq!(cover_change(&second.files[0].outcome), CoverChange::Unchanged);
    assert_eq!(fs::read(file).unwrap(), after_first);
}

#[tokio::test]
async fn test_m4a_embed_twice_second_run_unchanged() {
    let lib = Library::new();
    let song = lib.tagged(
        "song.m4a",
        fixtures::m4a_bytes(),
        TagPatch::cover(CoverImage::from_bytes(fixtures::png_bytes(300, 200))),
    );

    assert_embed_is_idempotent(&lib, &song).await;
}

#[tokio::test]
async fn test_opus_embed_twice_second_run_unchanged() {
    let lib = Library::new();
    let song = lib.tagged(
        "voice.opus",
        fixtures::opus_bytes(),
        TagPatch::cover(CoverImage::from_bytes(fixtures::png_bytes(300, 200))),
    );

    assert_embed_is_idempotent(&lib, &song).await;
}

#[tokio::test]
async fn test_track_and_sidecar_in_both_mode() {
    let lib = Library::new();
    lib.mp3("Album/01 - track.mp3", Some(1), Some("Song"), None, None);
    lib.write("Album/cover.png", &fixtures::png_bytes(800, 400));

    let report = lib.run(lib.config(RunMode::Both)).await;
    assert_eq!(report.succeeded, 1);
    assert_eq!(report.failed, 0);

    let renamed = lib.path("Album/01 - Song.mp3");
    assert!(renamed.exists());
    assert!(!lib.path("Album/01 - track.mp3").exists());
    assert_eq!(report.files[0].after_path, renamed);

    let tags = read_tags(&renamed);
    assert_eq!(tags.track_number, Some(1));
    assert_eq!(tags.title.as_deref(), Some("Song"));
    let cover = tags.cover.expect("cover embedded");
    assert_eq!(cover.kind, ImageKind::Jpeg);
    assert_eq!(cover.dimensions, Some((600, 600)));

    // The sidecar is left where it was.
    assert!(lib.path("Album/cover.png").exists());
}

#[tokio::test]
async fn test_normalized_flac_is_unchanged() {
    let lib = Library::new();
    let flac = lib.flac("a.flac", TagPatch::cover(fixtures::cover(600, 600)));
    let before = fs::read(&flac).unwrap();

    let report = lib.run(lib.config(RunMode::EmbedOnly)).await;
    assert_eq!(report.succeeded, 1);
    assert_eq!(cover_change(&report.files[0].outcome), CoverChange::Unchanged);
    assert_eq!(fs::read(&flac).unwrap(), before);
}

#[tokio::test]
async fn test_collision_keeps_both_files() {
    let lib = Library::new();
    lib.mp3("a.mp3", Some(1), Some("Song"), Some("First"), None);
    lib.mp3("b.mp3", Some(1), Some("Song"), Some("Second"), None);

    let report = lib.run(lib.config(RunMode::RenameOnly).with_workers(2)).await;
    assert_eq!(report.succeeded, 2);
    assert_eq!(
        lib.file_names(""),
        vec!["01 - Song (2).mp3".to_string(), "01 - Song.mp3".to_string()]
    );

    let albums: BTreeSet<String> = ["01 - Song.mp3", "01 - Song (2).mp3"]
        .iter()
        .filter_map(|name| read_tags(&lib.path(name)).album)
        .collect();
    assert_eq!(
        albums,
        BTreeSet::from(["First".to_string(), "Second".to_string()])
    );
}

#[tokio::test]
async fn test_rename_is_idempotent() {
    let lib = Library::new();
    lib.mp3("x.mp3", Some(3), Some("Third"), None, None);

    lib.run(lib.config(RunMode::RenameOnly)).await;
    let second = lib.run(lib.config(RunMode::RenameOnly)).await;

    match &second.files[0].outcome {
        JobOutcome::Success(changes) => assert_eq!(changes.renamed_to, None),
        other => panic!("unexpected {:?}", other),
    }
    assert_eq!(lib.file_names(""), vec!["03 - Third.mp3".to_string()]);
}

#[tokio::test]
async fn test_backup_matches_original() {
    let lib = Library::new();
    let song = lib.mp3(
        "song.mp3",
        None,
        None,
        None,
        Some(CoverImage::from_bytes(fixtures::png_bytes(100, 100))),
    );
    let original = fs::read(&song).unwrap();

    let report = lib
        .run(lib.config(RunMode::EmbedOnly).with_backup(true))
        .await;

    let backup = lib.path("song_backup.mp3");
    assert_eq!(fs::read(&backup).unwrap(), original);
    assert_ne!(fs::read(&song).unwrap(), original);
    match &report.files[0].outcome {
        JobOutcome::Success(changes) => assert_eq!(changes.backup_path.as_ref(), Some(&backup)),
        other => panic!("unexpected {:?}", other),
    }

    // Backups are never picked up as jobs themselves.
    let second = lib
        .run(lib.config(RunMode::EmbedOnly).with_backup(true))
        .await;
    assert_eq!(second.total, 1);
    assert_eq!(fs::read(&backup).unwrap(), original);
}

#[tokio::test]
async fn test_partial_failure_is_isolated() {
    let lib = Library::new();
    for name in ["a.mp3", "b.mp3", "c.mp3"] {
        lib.mp3(name, None, None, None, Some(fixtures::cover(600, 600)));
    }
    let garbage = b"this is not a flac stream at all".to_vec();
    let bad = lib.write("bad.flac", &garbage);

    let report = lib.run(lib.config(RunMode::EmbedOnly).with_workers(3)).await;
    assert_eq!(report.total, 4);
    assert_eq!(report.succeeded, 3);
    assert_eq!(report.failed, 1);
    assert_eq!(report.failures[0].path, bad);
    assert_eq!(report.failures[0].kind, ErrorKind::CorruptContainer);
    assert_eq!(fs::read(&bad).unwrap(), garbage);
}

#[tokio::test]
async fn test_missing_cover_is_skipped() {
    let lib = Library::new();
    lib.mp3("bare.mp3", Some(1), Some("Bare"), None, None);

    let report = lib.run(lib.config(RunMode::EmbedOnly)).await;
    assert_eq!(report.skipped, 1);
    assert_eq!(
        report.files[0].outcome,
        JobOutcome::Skipped(SkipReason::NoCoverArt)
    );
}

#[tokio::test]
async fn test_dry_run_changes_nothing() {
    let lib = Library::new();
    lib.mp3(
        "Stuff/a.mp3",
        Some(1),
        Some("One"),
        Some("Blue"),
        Some(CoverImage::from_bytes(fixtures::png_bytes(50, 80))),
    );
    lib.mp3("Stuff/b.mp3", Some(2), Some("Two"), Some("Blue"), None);
    lib.write("Stuff/folder.jpg", &fixtures::jpeg_bytes(1000, 1000));
    let before = lib.snapshot();

    let report = lib
        .run(
            lib.config(RunMode::Both)
                .with_dry_run(true)
                .with_backup(true)
                .with_rename_folders(true),
        )
        .await;

    assert_eq!(lib.snapshot(), before);
    assert!(report.dry_run);
    assert_eq!(report.failed, 0);
    assert_eq!(report.modified_files().count(), 2);
    match &report.folders[0].outcome {
        JobOutcome::Success(changes) => {
            assert_eq!(changes.renamed_to, Some(lib.path("Blue")));
        }
        other => panic!("unexpected {:?}", other),
    }
}

#[tokio::test]
async fn test_folders_renamed_after_files() {
    let lib = Library::new();
    lib.mp3("misc/CD1/x.mp3", Some(1), Some("A"), Some("Disc One"), None);
    lib.mp3("misc/y.mp3", Some(1), Some("B"), Some("Parent"), None);

    let report = lib
        .run(lib.config(RunMode::RenameOnly).with_rename_folders(true))
        .await;
    assert_eq!(report.failed, 0);
    assert_eq!(report.folders.len(), 1);

    assert!(lib.path("Parent/CD1/01 - A.mp3").exists());
    assert!(lib.path("Parent/01 - B.mp3").exists());
    assert!(!lib.path("misc").exists());
}

#[tokio::test]
async fn test_multi_disc_layout_is_preserved() {
    let lib = Library::new();
    lib.mp3("Album/CD1/a.mp3", Some(1), Some("Intro"), Some("Album"), None);
    lib.mp3("Album/CD1/b.mp3", Some(2), Some("Verse"), Some("Album"), None);
    lib.mp3("Album/CD2/c.mp3", Some(1), Some("Outro"), Some("Album"), None);

    let report = lib
        .run(lib.config(RunMode::RenameOnly).with_rename_folders(true))
        .await;
    assert_eq!(report.failed, 0);
    assert!(report.folders.is_empty());

    assert_eq!(lib.file_names("Album"), vec!["CD1".to_string(), "CD2".to_string()]);
    assert!(lib.path("Album/CD1/01 - Intro.mp3").exists());
    assert!(lib.path("Album/CD1/02 - Verse.mp3").exists());
    assert!(lib.path("Album/CD2/01 - Outro.mp3").exists());
}
