use std::path::PathBuf;
use xplore_core::{
    DocumentList, ExtractForm, IngestError, Ingestor, INITIAL_STATUS, NO_DOCS_STATUS,
};

fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../tests/fixtures").join(name)
}

#[test]
fn import_clear_import_restarts_ids() {
    let ingestor = Ingestor::new();
    let mut list = DocumentList::new();
    assert_eq!(list.status(), INITIAL_STATUS);

    let rejected = list.import(
        &ingestor,
        &[fixture("small.pdf"), fixture("invalid.pdf"), fixture("three-pages.pdf")],
    );

    let ids: Vec<u32> = list.iter().map(|doc| doc.id()).collect();
    assert_eq!(ids, [1, 2]);
    assert_eq!(rejected.len(), 1);
    assert!(matches!(rejected[0].error, IngestError::InvalidDocument { .. }));
    assert_eq!(
        list.status(),
        format!("Failed to read: {}", fixture("invalid.pdf").display())
    );

    list.clear();
    assert_eq!(list.status(), NO_DOCS_STATUS);

    let rejected = list.import(&ingestor, &[fixture("with-info.pdf")]);
    assert!(rejected.is_empty());
    assert_eq!(list.status(), "");
    assert_eq!(list.iter().map(|doc| doc.id()).collect::<Vec<_>>(), [1]);
}

#[test]
fn successive_batches_never_reuse_ids() {
    let ingestor = Ingestor::new();
    let mut list = DocumentList::new();

    list.import(&ingestor, &[fixture("small.pdf"), fixture("with-info.pdf")]);
    list.import(&ingestor, &[fixture("missing.pdf"), fixture("three-pages.pdf")]);
    list.import(&ingestor, &[fixture("small.pdf")]);

    let ids: Vec<u32> = list.iter().map(|doc| doc.id()).collect();
    assert_eq!(ids, [1, 2, 3, 4]);
    assert!(ids.windows(2).all(|pair| pair[0] < pair[1]));
}

#[test]
fn extract_edits_survive_navigation_away_with_blank_fields() {
    let mut list = DocumentList::new();
    list.import(&Ingestor::new(), &[fixture("with-info.pdf")]);
    let doc = list.get_mut(1).expect("imported document");

    let mut form = ExtractForm::load(&doc.extract);
    form.set(doc_model::ExtractField::Title, "Document Analysis");
    form.commit(&mut doc.extract);

    let mut form = ExtractForm::load(&doc.extract);
    form.set(doc_model::ExtractField::Title, "");
    form.commit(&mut doc.extract);

    assert_eq!(doc.extract.title, "Document Analysis");
}
