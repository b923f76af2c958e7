use anyhow::Result;
use std::path::Path;
use std::sync::Arc;

use dosewise::catalog::store::list_drugs;
use dosewise::config::DosewiseConfig;
use dosewise::{db, matcher, ocr};

/// Recognize an image, print its text and the catalog drugs it names.
pub async fn scan(config: &DosewiseConfig, image: &Path) -> Result<()> {
    let recognizer: Arc<dyn ocr::TextRecognizer> = Arc::from(ocr::create_recognizer(&config.ocr));
    let text = super::recognize_with_progress(recognizer, image.to_path_buf()).await?;

    println!("Recognized text:");
    println!("{}", text.trim());
    println!();

    let db_path = config.resolved_db_path();
    if !db_path.exists() {
        println!("No catalog at {}; skipping name matching.", db_path.display());
        return Ok(());
    }

    let conn = db::open_database(&db_path)?;
    let drugs = list_drugs(&conn)?;
    let report = matcher::match_names(&text, &drugs, &[]);
    println!("{}", report.message());
    for drug in &report.added {
        println!("  {} ({})", drug.name, drug.id);
    }

    Ok(())
}
