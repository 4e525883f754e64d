//! Create/update coordination for the console's entity editors.
//!
//! An [`Editor`] is the modal form state: open or closed, create or edit,
//! the id being edited and the current field values. [`MutationCoordinator`]
//! submits the editor's payload through a [`Mutations`] backend and, on
//! success, invalidates the owning list and resets the editor.

use crate::cache::QueryCache;
use async_trait::async_trait;
use std::fmt;
use std::sync::Arc;

/// Backend for one entity kind.
#[async_trait]
pub trait Mutations: Send + Sync {
    type Id: Clone + fmt::Debug + fmt::Display + Send + Sync;
    type Payload: Send;
    type Error: std::error::Error + Send + Sync + 'static;

    async fn create(&self, payload: Self::Payload) -> Result<(), Self::Error>;

    async fn update(&self, id: &Self::Id, payload: Self::Payload) -> Result<(), Self::Error>;
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EditorMode {
    Create,
    Edit,
}

/// Modal editor state.
#[derive(Clone, Debug)]
pub struct Editor<V, Id> {
    open: bool,
    mode: EditorMode,
    target: Option<Id>,
    values: V,
    error: Option<String>,
}

impl<V: Default, Id> Default for Editor<V, Id> {
    fn default() -> Self {
        Self {
            open: false,
            mode: EditorMode::Create,
            target: None,
            values: V::default(),
            error: None,
        }
    }
}

impl<V: Default, Id> Editor<V, Id> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Open an empty form for a new entity.
    pub fn open_create(&mut self) {
        *self = Self {
            open: true,
            ..Self::default()
        };
    }

    /// Open the form pre-filled with an existing entity.
    pub fn open_edit(&mut self, id: Id, values: V) {
        *self = Self {
            open: true,
            mode: EditorMode::Edit,
            target: Some(id),
            values,
            error: None,
        };
    }

    /// Close and forget the form contents.
    pub fn close(&mut self) {
        *self = Self::default();
    }

    #[must_use]
    pub fn is_open(&self) -> bool {
        self.open
    }

    #[must_use]
    pub fn mode(&self) -> EditorMode {
        self.mode
    }

    #[must_use]
    pub fn target(&self) -> Option<&Id> {
        self.target.as_ref()
    }

    #[must_use]
    pub fn values(&self) -> &V {
        &self.values
    }

    pub fn values_mut(&mut self) -> &mut V {
        &mut self.values
    }

    #[must_use]
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Surface an error without closing the form.
    pub fn set_error(&mut self, message: impl Into<String>) {
        self.error = Some(message.into());
    }
}

#[derive(Debug, thiserror::Error)]
pub enum MutationError<E: std::error::Error + 'static> {
    #[error("editor is not open")]
    NotOpen,

    #[error("edit mode requires a target id")]
    MissingTarget,

    #[error(transparent)]
    Remote(#[from] E),
}

/// Submits editor payloads for one list.
pub struct MutationCoordinator<M> {
    backend: M,
    cache: Arc<QueryCache>,
    list: Arc<str>,
}

impl<M: Mutations> MutationCoordinator<M> {
    pub fn new(backend: M, cache: Arc<QueryCache>, list: impl Into<Arc<str>>) -> Self {
        Self {
            backend,
            cache,
            list: list.into(),
        }
    }

    #[must_use]
    pub fn backend(&self) -> &M {
        &self.backend
    }

    /// Create or update depending on the editor mode.
    ///
    /// On success the list is invalidated and the editor closes. On failure the
    /// editor stays open with its values and carries the error message.
    ///
    /// # Errors
    /// `NotOpen` / `MissingTarget` for an inconsistent editor, or the
    /// backend error.
    pub async fn submit<V: Default>(
        &self,
        editor: &mut Editor<V, M::Id>,
        payload: M::Payload,
    ) -> Result<(), MutationError<M::Error>> {
        if !editor.open {
            return Err(MutationError::NotOpen);
        }

        let result = match editor.mode {
            EditorMode::Create => self.backend.create(payload).await,
            EditorMode::Edit => {
                let Some(id) = editor.target.clone() else {
                    editor.error = Some(MutationError::<M::Error>::MissingTarget.to_string());
                    return Err(MutationError::MissingTarget);
                };
                self.backend.update(&id, payload).await
            }
        };

        match result {
            Ok(()) => {
                tracing::info!(
                    list = %self.list,
                    mode = ?editor.mode,
                    target = ?editor.target,
                    "mutation succeeded"
                );
                self.cache.invalidate(&self.list);
                editor.close();
                Ok(())
            }
            Err(err) => {
                tracing::warn!(list = %self.list, error = %err, "mutation failed");
                editor.error = Some(err.to_string());
                Err(MutationError::Remote(err))
            }
        }
    }
}
