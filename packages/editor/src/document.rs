//! # Document Handle
//!
//! A Document is one form's block tree plus its editing state.
//!
//! Documents can be:
//! - **Memory-backed**: Temporary, for tests and generated forms
//! - **File-backed**: Persisted as a `jsonBlocks` file on disk
//!
//! ## Lifecycle
//!
//! ```text
//! Load → Deserialize → Edit → Serialize → Save
//!   ↓         ↓          ↓        ↓         ↓
//! File   FormDocument Mutations  JSON     File
//! ```
//!
//! A published document is read-only: [`Document::is_mutable`] is the single
//! check every caller uses before editing.

use crate::errors::EditorError;
use crate::mutations::{Mutation, MutationContext, MutationResult};
use formcraft_blocks::{deserialize, serialize, serialize_pretty, FormDocument, Registry};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Editable form document
#[derive(Debug, Clone)]
pub struct Document {
    /// Key the form is stored under
    pub form_id: String,

    /// Current version number (increments on each change to the tree)
    pub version: u64,

    /// Published forms accept submissions and no longer accept edits
    pub published: bool,

    form: FormDocument,

    /// Backing storage strategy
    storage: DocumentStorage,
}

/// Storage backend for document
#[derive(Debug, Clone)]
pub enum DocumentStorage {
    /// In-memory only
    Memory,

    /// File-backed
    File { path: PathBuf, dirty: bool },
}

impl Document {
    /// Memory-backed document around an existing tree
    pub fn new(form_id: impl Into<String>, form: FormDocument) -> Self {
        Self {
            form_id: form_id.into(),
            version: 0,
            published: false,
            form,
            storage: DocumentStorage::Memory,
        }
    }

    /// Memory-backed document from persisted `jsonBlocks`
    pub fn from_json(
        form_id: impl Into<String>,
        json: &str,
        registry: &Registry,
    ) -> Result<Self, EditorError> {
        Ok(Self::new(form_id, deserialize(json, registry)?))
    }

    /// Load document from file (file-backed)
    ///
    /// A missing or unreadable file is [`EditorError::Io`]; a file whose
    /// content is not a valid form is [`EditorError::Deserialize`].
    pub fn load(path: impl Into<PathBuf>, registry: &Registry) -> Result<Self, EditorError> {
        let path = path.into();
        let source = std::fs::read_to_string(&path)?;
        let form = deserialize(&source, registry)?;
        info!(path = %path.display(), blocks = form.block_count(), "form loaded");

        Ok(Self {
            form_id: form_id_for(&path),
            version: 0,
            published: false,
            form,
            storage: DocumentStorage::File { path, dirty: false },
        })
    }

    /// New file-backed document that has not been written yet
    pub fn create(path: impl Into<PathBuf>, form: FormDocument) -> Self {
        let path = path.into();
        Self {
            form_id: form_id_for(&path),
            version: 0,
            published: false,
            form,
            storage: DocumentStorage::File { path, dirty: true },
        }
    }

    pub fn form(&self) -> &FormDocument {
        &self.form
    }

    pub fn is_mutable(&self) -> bool {
        !self.published
    }

    pub fn set_published(&mut self, published: bool) {
        self.published = published;
    }

    /// Apply a mutation; refused on published documents
    pub fn apply(
        &mut self,
        mutation: &Mutation,
        ctx: &mut MutationContext<'_>,
    ) -> Result<MutationResult, EditorError> {
        if !self.is_mutable() {
            return Err(EditorError::ReadOnly);
        }

        let outcome = mutation.apply(&mut self.form, ctx)?;
        if outcome.is_applied() {
            self.touch();
        }

        Ok(MutationResult {
            version: self.version,
            outcome,
        })
    }

    /// Swap in a whole new tree (undo/redo, generated forms)
    pub fn replace(&mut self, form: FormDocument) -> Result<u64, EditorError> {
        if !self.is_mutable() {
            return Err(EditorError::ReadOnly);
        }
        self.form = form;
        self.touch();
        Ok(self.version)
    }

    fn touch(&mut self) {
        self.version += 1;
        if let DocumentStorage::File { dirty, .. } = &mut self.storage {
            *dirty = true;
        }
    }

    /// Check if document has unsaved changes
    pub fn is_dirty(&self) -> bool {
        match &self.storage {
            DocumentStorage::File { dirty, .. } => *dirty,
            DocumentStorage::Memory => false,
        }
    }

    pub fn path(&self) -> Option<&Path> {
        match &self.storage {
            DocumentStorage::File { path, .. } => Some(path),
            DocumentStorage::Memory => None,
        }
    }

    /// Persisted form of the tree
    pub fn to_json(&self, pretty: bool) -> Result<String, EditorError> {
        let json = if pretty {
            serialize_pretty(&self.form)?
        } else {
            serialize(&self.form)?
        };
        Ok(json)
    }

    /// Save document to disk (if file-backed)
    pub fn save(&mut self, pretty: bool) -> Result<(), EditorError> {
        let json = self.to_json(pretty)?;
        match &mut self.storage {
            DocumentStorage::File { path, dirty } => {
                if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                    std::fs::create_dir_all(parent)?;
                }
                std::fs::write(&*path, json)?;
                *dirty = false;
                debug!(path = %path.display(), "form saved");
                Ok(())
            }
            DocumentStorage::Memory => Err(EditorError::NotFileBacked),
        }
    }
}

fn form_id_for(path: &Path) -> String {
    path.file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use formcraft_blocks::{BlockType, IdGenerator};

    fn seeded() -> (Document, IdGenerator) {
        let mut ids = IdGenerator::from_seed("d");
        let form = FormDocument::seed("Test", "", Registry::builtin(), &mut ids);
        (Document::new("test", form), ids)
    }

    #[test]
    fn test_create_memory_document() {
        let (doc, _) = seeded();
        assert_eq!(doc.version, 0);
        assert!(!doc.is_dirty());
        assert!(doc.is_mutable());
        assert_eq!(doc.form().len(), 1);
    }

    #[test]
    fn test_version_increments_only_on_success() {
        let (mut doc, mut ids) = seeded();
        let mut ctx = MutationContext::new(Registry::builtin(), &mut ids);

        let result = doc
            .apply(
                &Mutation::InsertTopLevel {
                    block_type: BlockType::TextField,
                    index: 1,
                },
                &mut ctx,
            )
            .unwrap();
        assert_eq!(result.version, 1);

        let failed = doc.apply(&Mutation::Remove { block_id: "nope".into() }, &mut ctx);
        assert!(failed.is_err());

        let noop = doc
            .apply(
                &Mutation::MoveTopLevel {
                    from_index: 1,
                    to_index: 1,
                },
                &mut ctx,
            )
            .unwrap();
        assert!(!noop.outcome.is_applied());
        assert_eq!(doc.version, 1);
    }

    #[test]
    fn test_published_document_is_read_only() {
        let (mut doc, mut ids) = seeded();
        let before = doc.form().clone();
        doc.set_published(true);
        let mut ctx = MutationContext::new(Registry::builtin(), &mut ids);

        let err = doc
            .apply(
                &Mutation::InsertTopLevel {
                    block_type: BlockType::Heading,
                    index: 0,
                },
                &mut ctx,
            )
            .unwrap_err();

        assert!(matches!(err, EditorError::ReadOnly));
        assert_eq!(doc.form(), &before);
    }

    #[test]
    fn test_memory_document_cannot_save() {
        let (mut doc, _) = seeded();
        assert!(matches!(doc.save(true), Err(EditorError::NotFileBacked)));
    }

    #[test]
    fn test_load_distinguishes_io_from_bad_content() {
        let dir = tempfile::tempdir().unwrap();

        let missing = Document::load(dir.path().join("missing.json"), Registry::builtin());
        assert!(matches!(missing, Err(EditorError::Io(_))));

        let bad = dir.path().join("bad.json");
        std::fs::write(&bad, "[{\"id\": 1}]").unwrap();
        let invalid = Document::load(&bad, Registry::builtin());
        assert!(matches!(invalid, Err(EditorError::Deserialize(_))));
    }

    #[test]
    fn test_save_and_reload() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("forms").join("contact.json");
        let mut ids = IdGenerator::from_seed("c");
        let form = FormDocument::seed("Contact", "", Registry::builtin(), &mut ids);

        let mut doc = Document::create(&path, form.clone());
        assert!(doc.is_dirty());
        doc.save(false).unwrap();
        assert!(!doc.is_dirty());

        let loaded = Document::load(&path, Registry::builtin()).unwrap();
        assert_eq!(loaded.form_id, "contact");
        assert_eq!(loaded.form(), &form);
    }
}
