//! # Edit Session Management
//!
//! An EditSession is one editor's state for one form: the document, the
//! selected block, the loading flag and the undo history. Every edit goes
//! through the session, and subscribers are told synchronously after each
//! change that took effect.
//!
//! Sessions are independent values. Two editors open on the same form hold
//! two sessions, each with its own randomly seeded id generator.
//!
//! ## Asynchronous completions
//!
//! A generation request is started with [`EditSession::begin_generation`],
//! which hands out a [`GenerationTicket`]. The answer comes back through
//! [`EditSession::complete_generation`] with that ticket. Answers for a
//! ticket that is no longer current (superseded, cancelled or the session
//! closed) are discarded without touching the tree.

use crate::attributes::attribute_update;
use crate::document::Document;
use crate::errors::EditorError;
use crate::generation::{merge, prepare_blocks, ActionType, GenerationRequest, GenerationResponse};
use crate::mutations::{Mutation, MutationContext, MutationError, MutationOutcome, MutationResult};
use crate::undo_stack::UndoStack;
use formcraft_blocks::render::{property_editor, render_canvas};
use formcraft_blocks::{
    Attributes, BlockId, BlockInstance, BlockTarget, BlockType, FormDocument, IdGenerator,
    LiveForm, PropertyEditor, Registry, VNode,
};
use tracing::{debug, info, instrument, warn};

/// Change notification sent to subscribers
#[derive(Debug, Clone, PartialEq)]
pub enum SessionEvent {
    /// The tree changed; `version` is the document version after the change
    Changed { version: u64 },
    SelectionChanged { block_id: Option<BlockId> },
    LoadingChanged { loading: bool },
    PublishedChanged { published: bool },
    Closed,
}

/// Subscribers see the event together with the committed tree
pub type Subscriber = Box<dyn FnMut(&SessionEvent, &FormDocument)>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

/// Handle for one in-flight generation request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GenerationTicket(u64);

/// What happened to a generation answer
#[derive(Debug, Clone, PartialEq)]
pub enum GenerationOutcome {
    /// Merged as one undo step; `added` lists the new top-level ids
    Merged {
        action: ActionType,
        added: Vec<BlockId>,
    },
    /// The ticket was stale or the session closed
    Discarded,
}

#[derive(Debug, Clone)]
pub struct SessionOptions {
    /// Maximum undo steps kept (0 = unlimited)
    pub undo_levels: usize,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self { undo_levels: 100 }
    }
}

/// Name and description shown to collaborators
#[derive(Debug, Clone, Default)]
pub struct FormInfo {
    pub name: String,
    pub description: String,
}

/// Single edit session
pub struct EditSession<'r> {
    /// Unique session identifier
    pub id: String,

    document: Document,
    registry: &'r Registry,
    ids: IdGenerator,
    info: FormInfo,

    /// Currently selected block
    selected: Option<BlockId>,
    loading: bool,
    closed: bool,

    undo: UndoStack,

    /// Last ticket handed out; only this one may complete
    generation: u64,
    pending: Option<u64>,

    subscribers: Vec<(SubscriptionId, Subscriber)>,
    next_subscription: u64,
}

impl<'r> EditSession<'r> {
    /// Create new edit session
    pub fn new(id: impl Into<String>, document: Document, registry: &'r Registry) -> Self {
        Self::with_options(id, document, registry, SessionOptions::default())
    }

    pub fn with_options(
        id: impl Into<String>,
        document: Document,
        registry: &'r Registry,
        options: SessionOptions,
    ) -> Self {
        let info = FormInfo {
            name: document.form_id.clone(),
            description: String::new(),
        };
        Self {
            id: id.into(),
            document,
            registry,
            ids: IdGenerator::random(),
            info,
            selected: None,
            loading: false,
            closed: false,
            undo: UndoStack::with_max_levels(options.undo_levels),
            generation: 0,
            pending: None,
            subscribers: Vec::new(),
            next_subscription: 0,
        }
    }

    /// Use a specific id generator (deterministic ids in tests and tools)
    pub fn with_ids(mut self, ids: IdGenerator) -> Self {
        self.ids = ids;
        self
    }

    pub fn set_info(&mut self, info: FormInfo) {
        self.info = info;
    }

    pub fn info(&self) -> &FormInfo {
        &self.info
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    /// Mutable access for saving; edits must go through the session
    pub fn document_mut(&mut self) -> &mut Document {
        &mut self.document
    }

    pub fn form(&self) -> &FormDocument {
        self.document.form()
    }

    pub fn registry(&self) -> &'r Registry {
        self.registry
    }

    pub fn version(&self) -> u64 {
        self.document.version
    }

    pub fn selected(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    pub fn is_mutable(&self) -> bool {
        !self.closed && self.document.is_mutable()
    }

    // Subscribers

    pub fn subscribe(
        &mut self,
        subscriber: impl FnMut(&SessionEvent, &FormDocument) + 'static,
    ) -> SubscriptionId {
        let id = SubscriptionId(self.next_subscription);
        self.next_subscription += 1;
        self.subscribers.push((id, Box::new(subscriber)));
        id
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.subscribers.len();
        self.subscribers.retain(|(sub, _)| *sub != id);
        self.subscribers.len() != before
    }

    fn notify(&mut self, event: SessionEvent) {
        let form = self.document.form();
        for (_, subscriber) in &mut self.subscribers {
            subscriber(&event, form);
        }
    }

    fn ensure_open(&self) -> Result<(), EditorError> {
        if self.closed {
            Err(EditorError::SessionClosed)
        } else {
            Ok(())
        }
    }

    // Mutations

    /// Apply one mutation as one undo step
    #[instrument(skip(self), fields(session = %self.id))]
    pub fn apply(&mut self, mutation: Mutation) -> Result<MutationResult, EditorError> {
        self.ensure_open()?;

        let before = self.document.form().clone();
        let mut ctx = MutationContext::new(self.registry, &mut self.ids);
        let result = self.document.apply(&mutation, &mut ctx)?;

        if result.outcome.is_applied() {
            self.undo.record(before, self.document.form().clone());
            self.after_change();
        }
        Ok(result)
    }

    /// Apply several mutations all or nothing, as one undo step
    #[instrument(skip(self, mutations), fields(session = %self.id, count = mutations.len()))]
    pub fn apply_batch(
        &mut self,
        mutations: &[Mutation],
    ) -> Result<Vec<MutationOutcome>, EditorError> {
        self.ensure_open()?;
        if !self.document.is_mutable() {
            return Err(EditorError::ReadOnly);
        }

        let mut working = self.document.form().clone();
        let mut ctx = MutationContext::new(self.registry, &mut self.ids);
        let outcomes = mutations
            .iter()
            .map(|mutation| mutation.apply(&mut working, &mut ctx))
            .collect::<Result<Vec<_>, _>>()?;

        if outcomes.iter().any(MutationOutcome::is_applied) {
            self.commit(working, None)?;
        }
        Ok(outcomes)
    }

    pub fn insert_top_level(
        &mut self,
        block_type: BlockType,
        index: usize,
    ) -> Result<MutationOutcome, EditorError> {
        self.apply(Mutation::InsertTopLevel { block_type, index })
            .map(|result| result.outcome)
    }

    pub fn insert_child(
        &mut self,
        parent_id: &str,
        block_type: BlockType,
        index: usize,
    ) -> Result<MutationOutcome, EditorError> {
        self.apply(Mutation::InsertChild {
            parent_id: parent_id.to_string(),
            block_type,
            index,
        })
        .map(|result| result.outcome)
    }

    pub fn move_top_level(
        &mut self,
        from_index: usize,
        to_index: usize,
    ) -> Result<MutationOutcome, EditorError> {
        self.apply(Mutation::MoveTopLevel {
            from_index,
            to_index,
        })
        .map(|result| result.outcome)
    }

    pub fn move_child(
        &mut self,
        parent_id: &str,
        from_index: usize,
        to_index: usize,
    ) -> Result<MutationOutcome, EditorError> {
        self.apply(Mutation::MoveChild {
            parent_id: parent_id.to_string(),
            from_index,
            to_index,
        })
        .map(|result| result.outcome)
    }

    pub fn reparent_to_child(
        &mut self,
        block_id: &str,
        from_index: usize,
        parent_id: &str,
        index: usize,
    ) -> Result<MutationOutcome, EditorError> {
        self.apply(Mutation::ReparentToChild {
            block_id: block_id.to_string(),
            from_index,
            parent_id: parent_id.to_string(),
            index,
        })
        .map(|result| result.outcome)
    }

    pub fn duplicate(&mut self, block_id: &str) -> Result<MutationOutcome, EditorError> {
        self.apply(Mutation::Duplicate {
            block_id: block_id.to_string(),
        })
        .map(|result| result.outcome)
    }

    pub fn remove(&mut self, block_id: &str) -> Result<MutationOutcome, EditorError> {
        self.apply(Mutation::Remove {
            block_id: block_id.to_string(),
        })
        .map(|result| result.outcome)
    }

    pub fn update_child(
        &mut self,
        parent_id: &str,
        child_id: &str,
        instance: BlockInstance,
    ) -> Result<MutationOutcome, EditorError> {
        self.apply(Mutation::UpdateChild {
            parent_id: parent_id.to_string(),
            child_id: child_id.to_string(),
            instance,
        })
        .map(|result| result.outcome)
    }

    pub fn update_top_level(
        &mut self,
        block_id: &str,
        instance: BlockInstance,
    ) -> Result<MutationOutcome, EditorError> {
        self.apply(Mutation::UpdateTopLevel {
            block_id: block_id.to_string(),
            instance,
        })
        .map(|result| result.outcome)
    }

    /// Validated attribute edit; the tree is untouched when validation fails
    #[instrument(skip(self, partial), fields(session = %self.id, block = target.block_id()))]
    pub fn set_attributes(
        &mut self,
        target: &BlockTarget,
        partial: &Attributes,
    ) -> Result<MutationOutcome, EditorError> {
        self.ensure_open()?;
        let mutation = attribute_update(self.document.form(), self.registry, target, partial)?;
        self.apply(mutation).map(|result| result.outcome)
    }

    /// Swap in a new tree as one undo step
    fn commit(
        &mut self,
        form: FormDocument,
        description: Option<&str>,
    ) -> Result<u64, EditorError> {
        let before = self.document.form().clone();
        let version = self.document.replace(form)?;

        self.undo.begin_batch();
        if let Some(description) = description {
            self.undo.set_batch_description(description);
        }
        self.undo.record(before, self.document.form().clone());
        self.undo.end_batch();

        self.after_change();
        Ok(version)
    }

    fn after_change(&mut self) {
        // A removed block can no longer be selected
        let stale = self
            .selected
            .as_deref()
            .is_some_and(|id| !self.document.form().contains_id(id));
        if stale {
            self.selected = None;
            self.notify(SessionEvent::SelectionChanged { block_id: None });
        }

        let version = self.document.version;
        self.notify(SessionEvent::Changed { version });
    }

    // Selection

    /// Select a block, or clear the selection with `None`
    pub fn select(&mut self, block_id: Option<&str>) -> Result<(), EditorError> {
        self.ensure_open()?;
        if let Some(id) = block_id {
            if !self.document.form().contains_id(id) {
                return Err(MutationError::BlockNotFound(id.to_string()).into());
            }
        }
        if self.selected.as_deref() == block_id {
            return Ok(());
        }

        self.selected = block_id.map(str::to_string);
        let block_id = self.selected.clone();
        self.notify(SessionEvent::SelectionChanged { block_id });
        Ok(())
    }

    // Publishing

    pub fn set_published(&mut self, published: bool) -> Result<(), EditorError> {
        self.ensure_open()?;
        if self.document.published == published {
            return Ok(());
        }
        self.document.set_published(published);
        info!(session = %self.id, published, "publish state changed");
        self.notify(SessionEvent::PublishedChanged { published });
        Ok(())
    }

    // Undo / redo

    pub fn can_undo(&self) -> bool {
        self.undo.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.undo.can_redo()
    }

    /// Returns `false` when there was nothing to undo
    #[instrument(skip(self), fields(session = %self.id))]
    pub fn undo(&mut self) -> Result<bool, EditorError> {
        self.ensure_open()?;
        if !self.document.is_mutable() {
            return Err(EditorError::ReadOnly);
        }
        match self.undo.undo() {
            Some(form) => {
                self.document.replace(form)?;
                self.after_change();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    #[instrument(skip(self), fields(session = %self.id))]
    pub fn redo(&mut self) -> Result<bool, EditorError> {
        self.ensure_open()?;
        if !self.document.is_mutable() {
            return Err(EditorError::ReadOnly);
        }
        match self.undo.redo() {
            Some(form) => {
                self.document.replace(form)?;
                self.after_change();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    // Generation

    /// Start a generation request. A new request supersedes any pending
    /// one.
    #[instrument(skip(self), fields(session = %self.id))]
    pub fn begin_generation(
        &mut self,
        user_request: &str,
    ) -> Result<(GenerationTicket, GenerationRequest), EditorError> {
        self.ensure_open()?;
        if !self.document.is_mutable() {
            return Err(EditorError::ReadOnly);
        }
        if user_request.trim().is_empty() {
            return Err(EditorError::Generation("request is empty".into()));
        }

        self.generation += 1;
        self.pending = Some(self.generation);
        self.set_loading(true);

        let request = GenerationRequest::new(
            user_request,
            self.info.name.clone(),
            self.info.description.clone(),
            self.document.form().clone(),
        );
        Ok((GenerationTicket(self.generation), request))
    }

    /// Feed back the collaborator's answer (or its failure message)
    ///
    /// Failures and invalid answers leave the tree untouched and are
    /// returned as [`EditorError::Generation`].
    #[instrument(skip(self, answer), fields(session = %self.id))]
    pub fn complete_generation(
        &mut self,
        ticket: GenerationTicket,
        answer: Result<String, String>,
    ) -> Result<GenerationOutcome, EditorError> {
        if self.closed || self.pending != Some(ticket.0) {
            debug!(ticket = ticket.0, "discarding stale generation answer");
            return Ok(GenerationOutcome::Discarded);
        }
        self.pending = None;
        self.set_loading(false);

        let text = answer.map_err(|reason| {
            warn!(%reason, "generation failed");
            EditorError::Generation(reason)
        })?;
        let response = GenerationResponse::parse(&text)?;
        let blocks = prepare_blocks(
            &response.blocks,
            self.document.form(),
            self.registry,
            &mut self.ids,
        )?;
        let added: Vec<BlockId> = blocks.iter().map(|block| block.id.clone()).collect();

        let merged = merge(self.document.form(), response.action_type, blocks);
        self.commit(merged, Some(response.action_type.as_str()))?;
        info!(
            action = response.action_type.as_str(),
            added = added.len(),
            "generated blocks merged"
        );

        Ok(GenerationOutcome::Merged {
            action: response.action_type,
            added,
        })
    }

    /// Forget the pending request; its answer will be discarded
    pub fn cancel_generation(&mut self) {
        if self.pending.take().is_some() {
            self.set_loading(false);
        }
    }

    pub fn set_loading(&mut self, loading: bool) {
        if self.loading != loading {
            self.loading = loading;
            self.notify(SessionEvent::LoadingChanged { loading });
        }
    }

    /// Tear the session down. Nothing is saved.
    pub fn close(&mut self) {
        if self.closed {
            return;
        }
        self.pending = None;
        self.loading = false;
        self.closed = true;
        self.notify(SessionEvent::Closed);
        self.subscribers.clear();
        debug!(session = %self.id, "session closed");
    }

    // Views

    /// Builder canvas with the current selection highlighted
    pub fn canvas(&self) -> Vec<VNode> {
        render_canvas(self.document.form(), self.registry, self.selected.as_deref())
    }

    pub fn live_form(&self) -> LiveForm {
        LiveForm::build(self.document.form(), self.registry)
    }

    /// Property editor for the selected block
    pub fn property_editor(&self) -> Option<PropertyEditor> {
        let selected = self.selected.as_deref()?;
        property_editor(self.document.form(), self.registry, selected)
    }
}

impl std::fmt::Debug for EditSession<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EditSession")
            .field("id", &self.id)
            .field("form_id", &self.document.form_id)
            .field("version", &self.document.version)
            .field("selected", &self.selected)
            .field("loading", &self.loading)
            .field("closed", &self.closed)
            .field("subscribers", &self.subscribers.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn session() -> EditSession<'static> {
        let registry = Registry::builtin();
        let mut ids = IdGenerator::from_seed("s");
        let form = FormDocument::seed("Survey", "", registry, &mut ids);
        EditSession::new("client-1", Document::new("survey", form), registry).with_ids(ids)
    }

    fn recorder(session: &mut EditSession<'_>) -> Rc<RefCell<Vec<SessionEvent>>> {
        let events = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&events);
        session.subscribe(move |event, _| sink.borrow_mut().push(event.clone()));
        events
    }

    #[test]
    fn test_session_creation() {
        let session = session();
        assert_eq!(session.id, "client-1");
        assert_eq!(session.version(), 0);
        assert!(session.selected().is_none());
        assert!(!session.can_undo());
    }

    #[test]
    fn test_subscribers_see_committed_tree() {
        let mut session = session();
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        session.subscribe(move |event, form| {
            if let SessionEvent::Changed { version } = event {
                sink.borrow_mut().push((*version, form.block_count()));
            }
        });

        session.insert_top_level(BlockType::TextField, 1).unwrap();
        let _ = session.remove("s-1");

        assert_eq!(*seen.borrow(), vec![(1, 4)]);
    }

    #[test]
    fn test_noop_does_not_notify() {
        let mut session = session();
        let events = recorder(&mut session);

        let outcome = session.move_child("s-1", 1, 1).unwrap();
        assert_eq!(outcome, MutationOutcome::NoOp);
        assert!(events.borrow().is_empty());
        assert!(!session.can_undo());
    }

    #[test]
    fn test_undo_redo_round_trip() {
        let mut session = session();
        let original = session.form().clone();

        session.insert_child("s-1", BlockType::StarRating, 5).unwrap();
        let edited = session.form().clone();

        assert!(session.undo().unwrap());
        assert_eq!(session.form(), &original);
        assert!(session.redo().unwrap());
        assert_eq!(session.form(), &edited);
        assert!(!session.redo().unwrap());
    }

    #[test]
    fn test_removing_selected_block_clears_selection() {
        let mut session = session();
        session.select(Some("s-3")).unwrap();
        assert_eq!(session.property_editor().map(|e| e.title().to_string()), Some("Paragraph 2".into()));

        let events = recorder(&mut session);
        session.remove("s-3").unwrap();

        assert!(session.selected().is_none());
        assert_eq!(
            events.borrow()[0],
            SessionEvent::SelectionChanged { block_id: None }
        );
    }

    #[test]
    fn test_select_unknown_block_fails() {
        let mut session = session();
        assert!(session.select(Some("nope")).is_err());
        assert!(session.selected().is_none());
    }

    #[test]
    fn test_batch_is_all_or_nothing() {
        let mut session = session();
        let before = session.form().clone();

        let result = session.apply_batch(&[
            Mutation::InsertTopLevel {
                block_type: BlockType::Heading,
                index: 1,
            },
            Mutation::Remove {
                block_id: "s-1".into(),
            },
        ]);

        assert!(matches!(
            result,
            Err(EditorError::Mutation(MutationError::BlockLocked(_)))
        ));
        assert_eq!(session.form(), &before);
        assert_eq!(session.version(), 0);
    }

    #[test]
    fn test_generation_merge_is_one_undo_step() {
        let mut session = session();
        let before = session.form().clone();
        let (ticket, request) = session.begin_generation("add contact questions").unwrap();
        assert!(session.is_loading());
        assert_eq!(request.form_name, "survey");

        let answer = json!({
            "actionType": "addQuestions",
            "blocks": [
                {"id": "x1", "blockType": "TextField", "attributes": {"label": "Email"}},
                {"id": "x2", "blockType": "TextArea"}
            ]
        })
        .to_string();

        let outcome = session.complete_generation(ticket, Ok(answer)).unwrap();
        match outcome {
            GenerationOutcome::Merged { action, added } => {
                assert_eq!(action, ActionType::AddQuestions);
                assert_eq!(added.len(), 2);
                assert!(added.iter().all(|id| id != "x1" && id != "x2"));
            }
            other => panic!("unexpected outcome: {other:?}"),
        }
        assert!(!session.is_loading());
        assert_eq!(session.form().len(), 3);
        assert!(session.form().duplicate_ids().is_empty());

        session.undo().unwrap();
        assert_eq!(session.form(), &before);
    }

    #[test]
    fn test_stale_ticket_discarded() {
        let mut session = session();
        let (first, _) = session.begin_generation("one").unwrap();
        let (second, _) = session.begin_generation("two").unwrap();

        let answer = r#"{"actionType": "createForm", "blocks": []}"#.to_string();
        let outcome = session.complete_generation(first, Ok(answer.clone())).unwrap();
        assert_eq!(outcome, GenerationOutcome::Discarded);
        assert_eq!(session.form().len(), 1);

        session.close();
        let outcome = session.complete_generation(second, Ok(answer)).unwrap();
        assert_eq!(outcome, GenerationOutcome::Discarded);
        assert_eq!(session.form().len(), 1);
    }

    #[test]
    fn test_failed_generation_leaves_tree() {
        let mut session = session();
        let before = session.form().clone();

        let (ticket, _) = session.begin_generation("anything").unwrap();
        let err = session
            .complete_generation(ticket, Err("quota exceeded".into()))
            .unwrap_err();
        assert!(matches!(err, EditorError::Generation(_)));

        let (ticket, _) = session.begin_generation("anything").unwrap();
        let bad = r#"{"actionType": "shuffle", "blocks": []}"#.to_string();
        assert!(session.complete_generation(ticket, Ok(bad)).is_err());

        assert_eq!(session.form(), &before);
        assert!(!session.is_loading());
    }

    #[test]
    fn test_published_session_rejects_edits() {
        let mut session = session();
        session.set_published(true).unwrap();

        assert!(matches!(
            session.insert_top_level(BlockType::Media, 0),
            Err(EditorError::ReadOnly)
        ));
        assert!(matches!(
            session.begin_generation("more"),
            Err(EditorError::ReadOnly)
        ));
    }

    #[test]
    fn test_closed_session_rejects_edits() {
        let mut session = session();
        let events = recorder(&mut session);
        session.close();

        assert_eq!(*events.borrow(), vec![SessionEvent::Closed]);
        assert!(matches!(session.remove("s-3"), Err(EditorError::SessionClosed)));
    }
}
