use std::path::PathBuf;

use anyhow::Result;
use hoidap::KnowledgeBase;

/// Writes knowledge base contents to a temp file and returns its path along
/// with the guard keeping the directory alive.
fn write_training_file(contents: &str) -> Result<(tempfile::TempDir, PathBuf)> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("training.txt");
    std::fs::write(&path, contents)?;
    Ok((dir, path))
}

#[test]
fn test_load_counts_complete_pairs_only() -> Result<()> {
    // Arrange: three complete pairs plus one trailing unmatched question
    let (_dir, path) = write_training_file(
        "HỎI: Thủ đô của Việt Nam là gì?\n\
         ĐÁP: Hà Nội.\n\
         HỎI: Một ngày có bao nhiêu giờ?\n\
         ĐÁP: 24 giờ.\n\
         \n\
         unrelated line\n\
         HỎI: Nước sôi ở bao nhiêu độ C?\n\
         ĐÁP: 100 độ C.\n\
         HỎI: dangling question\n",
    )?;

    // Act
    let kb = KnowledgeBase::load(&path)?;

    // Assert: mapping size equals the number of complete pairs
    assert_eq!(kb.len(), 3);
    assert_eq!(kb.get("Thủ đô của Việt Nam là gì?"), Some("Hà Nội."));
    assert_eq!(kb.get("dangling question"), None);

    Ok(())
}

#[test]
fn test_duplicate_question_last_answer_wins() -> Result<()> {
    let (_dir, path) = write_training_file("HỎI: Q\nĐÁP: A1\nHỎI: Q\nĐÁP: A2\n")?;

    let kb = KnowledgeBase::load(&path)?;

    assert_eq!(kb.len(), 1);
    assert_eq!(kb.get("Q"), Some("A2"));

    Ok(())
}

#[test]
fn test_missing_file_falls_back_to_empty_base() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("no-such-training.txt");

    // Absence is non-fatal: an empty, flagged base comes back
    let kb = KnowledgeBase::load(&path)?;

    assert!(kb.is_empty());
    assert!(kb.source_missing());
    assert_eq!(kb.get("anything"), None);

    Ok(())
}

#[test]
fn test_loading_twice_yields_equal_mappings() -> Result<()> {
    let (_dir, path) = write_training_file(
        "HỎI: Q1\nĐÁP: A1\nHỎI: Q2\nĐÁP: A2\nHỎI: Q3\nĐÁP: A3\n",
    )?;

    let first = KnowledgeBase::load(&path)?;
    let second = KnowledgeBase::load(&path)?;

    assert_eq!(first, second);

    Ok(())
}

#[test]
fn test_markers_are_required_prefixes() -> Result<()> {
    // Lines mentioning the markers mid-line are not entries
    let (_dir, path) = write_training_file(
        "note: HỎI: not a question\nHỎI: real\nĐÁP: answer\n",
    )?;

    let kb = KnowledgeBase::load(&path)?;

    assert_eq!(kb.len(), 1);
    assert_eq!(kb.get("real"), Some("answer"));

    Ok(())
}
