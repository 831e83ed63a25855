//! Create/edit form: dirty tracking, save confirmation and the unsaved
//! changes guard.

use tracing::warn;

use super::{BlogClient, ClientError, PostCache, PostDraft};
use crate::models::{Post, PostFormat};

pub const SAVE_FAILED_MESSAGE: &str = "Failed to save post. Please try again.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormState {
    Clean,
    Dirty,
    ConfirmPending,
    Saving,
    SaveFailed,
}

/// Text of a confirmation dialog.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Prompt {
    pub title: &'static str,
    pub message: &'static str,
    pub confirm_text: &'static str,
}

const CREATE_PROMPT: Prompt = Prompt {
    title: "Create Post",
    message: "Are you sure you want to create this post?",
    confirm_text: "Create",
};

const UPDATE_PROMPT: Prompt = Prompt {
    title: "Update Post",
    message: "Are you sure you want to save these changes?",
    confirm_text: "Update",
};

const LEAVE_PROMPT: Prompt = Prompt {
    title: "Unsaved Changes",
    message: "You have unsaved changes. Are you sure you want to leave?",
    confirm_text: "Leave",
};

/// The mutation a confirmed save must issue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaveRequest {
    Create(PostDraft),
    Update { id: String, draft: PostDraft },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaveOutcome {
    /// Fields were reset for the next post.
    Created(Post),
    Updated { post: Post, navigate_to: String },
    Failed,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Navigation {
    Proceed(String),
    /// Held back until the leave prompt is answered.
    Blocked,
}

#[derive(Debug, Clone)]
pub struct PostForm {
    original: Option<Post>,
    draft: PostDraft,
    state: FormState,
    error: Option<String>,
    pending_route: Option<String>,
    leave_prompt_open: bool,
}

fn blank_draft() -> PostDraft {
    PostDraft {
        format: PostFormat::Markdown,
        ..Default::default()
    }
}

fn draft_of(post: &Post) -> PostDraft {
    PostDraft {
        title: post.title.clone(),
        content: post.content.clone(),
        author: post.author.clone(),
        format: post.format,
    }
}

impl PostForm {
    /// Empty form for a new post. Content is written as Markdown.
    pub fn create() -> Self {
        Self {
            original: None,
            draft: blank_draft(),
            state: FormState::Clean,
            error: None,
            pending_route: None,
            leave_prompt_open: false,
        }
    }

    /// Form pre-filled with an existing post.
    pub fn edit(post: Post) -> Self {
        Self {
            draft: draft_of(&post),
            original: Some(post),
            ..Self::create()
        }
    }

    pub fn state(&self) -> FormState {
        self.state
    }

    pub fn draft(&self) -> &PostDraft {
        &self.draft
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn is_edit(&self) -> bool {
        self.original.is_some()
    }

    fn baseline(&self) -> PostDraft {
        self.original.as_ref().map(draft_of).unwrap_or_else(blank_draft)
    }

    pub fn has_changes(&self) -> bool {
        self.draft != self.baseline()
    }

    pub fn set_title(&mut self, title: impl Into<String>) {
        self.draft.title = title.into();
        self.refresh();
    }

    pub fn set_content(&mut self, content: impl Into<String>) {
        self.draft.content = content.into();
        self.refresh();
    }

    pub fn set_author(&mut self, author: impl Into<String>) {
        self.draft.author = author.into();
        self.refresh();
    }

    pub fn set_format(&mut self, format: PostFormat) {
        self.draft.format = format;
        self.refresh();
    }

    // Edits never interrupt an open prompt or an in-flight save.
    fn refresh(&mut self) {
        if matches!(self.state, FormState::ConfirmPending | FormState::Saving) {
            return;
        }
        self.state = if self.has_changes() {
            FormState::Dirty
        } else {
            FormState::Clean
        };
    }

    pub fn can_submit(&self) -> bool {
        self.has_changes() && matches!(self.state, FormState::Dirty | FormState::SaveFailed)
    }

    pub fn submit_label(&self) -> &'static str {
        match (self.state, self.is_edit()) {
            (FormState::Saving, _) => "Saving...",
            (_, true) => "Update Post",
            (_, false) => "Create Post",
        }
    }

    /// Opens the save confirmation. `None` when there is nothing to save.
    pub fn submit(&mut self) -> Option<Prompt> {
        if !self.can_submit() {
            return None;
        }
        self.state = FormState::ConfirmPending;
        Some(if self.is_edit() { UPDATE_PROMPT } else { CREATE_PROMPT })
    }

    pub fn cancel_submit(&mut self) {
        if self.state == FormState::ConfirmPending {
            self.state = FormState::Dirty;
        }
    }

    /// Moves to `Saving` and returns the mutation to issue.
    pub fn confirm_save(&mut self) -> Result<SaveRequest, ClientError> {
        if self.state != FormState::ConfirmPending {
            return Err(ClientError::InvalidState("save was not confirmed"));
        }
        self.state = FormState::Saving;
        self.error = None;

        Ok(match &self.original {
            Some(post) => SaveRequest::Update {
                id: post.id.clone(),
                draft: self.draft.clone(),
            },
            None => SaveRequest::Create(self.draft.clone()),
        })
    }

    /// Applies the server's answer to a save started by [`confirm_save`].
    ///
    /// [`confirm_save`]: PostForm::confirm_save
    pub fn complete_save(&mut self, result: Result<Option<Post>, ClientError>) -> SaveOutcome {
        if self.state != FormState::Saving {
            return SaveOutcome::Failed;
        }

        match result {
            Ok(Some(post)) => {
                self.state = FormState::Clean;
                if self.is_edit() {
                    self.draft = draft_of(&post);
                    self.original = Some(post.clone());
                    SaveOutcome::Updated {
                        navigate_to: format!("/blog/{}", post.id),
                        post,
                    }
                } else {
                    self.draft = blank_draft();
                    SaveOutcome::Created(post)
                }
            }
            Ok(None) => {
                warn!("Error saving post: post no longer exists");
                self.fail()
            }
            Err(e) => {
                warn!("Error saving post: {}", e);
                self.fail()
            }
        }
    }

    fn fail(&mut self) -> SaveOutcome {
        self.state = FormState::SaveFailed;
        self.error = Some(SAVE_FAILED_MESSAGE.to_string());
        SaveOutcome::Failed
    }

    /// Confirms the pending save: sends the mutation and, once the server
    /// answered, records the result in `cache`.
    pub async fn save(
        &mut self,
        client: &BlogClient,
        cache: &mut PostCache,
    ) -> Result<SaveOutcome, ClientError> {
        let request = self.confirm_save()?;

        let result = match &request {
            SaveRequest::Create(draft) => client.create_post(draft).await.map(Some),
            SaveRequest::Update { id, draft } => client.update_post(id, draft).await,
        };

        match (&request, &result) {
            (SaveRequest::Create(_), Ok(Some(post))) => cache.store_created(post.clone()),
            (SaveRequest::Update { .. }, Ok(Some(post))) => cache.store_post(post.clone()),
            // Gone on the server, drop our stale copy
            (SaveRequest::Update { id, .. }, Ok(None)) => {
                cache.evict(id);
            }
            _ => {}
        }

        Ok(self.complete_save(result))
    }

    /// Navigation guard. Leaving with unsaved changes is blocked and the
    /// target kept until [`confirm_leave`] or [`cancel_leave`].
    ///
    /// [`confirm_leave`]: PostForm::confirm_leave
    /// [`cancel_leave`]: PostForm::cancel_leave
    pub fn request_navigation(&mut self, url: impl Into<String>) -> Navigation {
        let url = url.into();
        if self.has_changes() && self.state != FormState::Saving {
            self.pending_route = Some(url);
            self.leave_prompt_open = true;
            Navigation::Blocked
        } else {
            Navigation::Proceed(url)
        }
    }

    pub fn leave_prompt(&self) -> Option<Prompt> {
        self.leave_prompt_open.then_some(LEAVE_PROMPT)
    }

    /// Discards the changes and releases the blocked navigation target.
    /// Does nothing unless the leave prompt is open.
    pub fn confirm_leave(&mut self) -> Option<String> {
        if !self.leave_prompt_open {
            return None;
        }
        self.leave_prompt_open = false;
        self.draft = self.baseline();
        self.state = FormState::Clean;
        self.pending_route.take()
    }

    pub fn cancel_leave(&mut self) {
        self.leave_prompt_open = false;
        self.pending_route = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn existing() -> Post {
        Post {
            id: "1".into(),
            title: "T".into(),
            content: "C".into(),
            author: "A".into(),
            format: PostFormat::Markdown,
            created_at: Utc::now(),
        }
    }

    fn filled_create_form() -> PostForm {
        let mut form = PostForm::create();
        form.set_title("T");
        form.set_author("A");
        form.set_content("C");
        form
    }

    #[test]
    fn new_form_is_clean_and_cannot_submit() {
        let mut form = PostForm::create();
        assert_eq!(form.state(), FormState::Clean);
        assert_eq!(form.draft().format, PostFormat::Markdown);
        assert!(!form.can_submit());
        assert_eq!(form.submit(), None);
        assert_eq!(form.submit_label(), "Create Post");
    }

    #[test]
    fn editing_back_to_the_original_is_clean_again() {
        let mut form = PostForm::edit(existing());
        form.set_title("New Title");
        assert_eq!(form.state(), FormState::Dirty);
        assert!(form.can_submit());

        form.set_title("T");
        assert_eq!(form.state(), FormState::Clean);
        assert!(!form.can_submit());
    }

    #[test]
    fn submit_asks_for_confirmation() {
        let mut form = filled_create_form();
        assert_eq!(form.submit(), Some(CREATE_PROMPT));
        assert_eq!(form.state(), FormState::ConfirmPending);

        form.cancel_submit();
        assert_eq!(form.state(), FormState::Dirty);

        let mut edit = PostForm::edit(existing());
        edit.set_content("C2");
        assert_eq!(edit.submit(), Some(UPDATE_PROMPT));
    }

    #[test]
    fn successful_create_resets_fields() {
        let mut form = filled_create_form();
        form.submit();
        let request = form.confirm_save().unwrap();
        assert!(matches!(request, SaveRequest::Create(ref d) if d.title == "T"));
        assert_eq!(form.state(), FormState::Saving);
        assert_eq!(form.submit_label(), "Saving...");
        assert!(form.submit().is_none());

        let outcome = form.complete_save(Ok(Some(existing())));

        assert!(matches!(outcome, SaveOutcome::Created(_)));
        assert_eq!(form.state(), FormState::Clean);
        assert_eq!(form.draft().title, "");
        assert_eq!(form.draft().author, "");
    }

    #[test]
    fn successful_update_navigates_to_detail() {
        let mut form = PostForm::edit(existing());
        form.set_title("T2");
        form.submit();
        let request = form.confirm_save().unwrap();
        assert!(matches!(request, SaveRequest::Update { ref id, .. } if id == "1"));

        let mut saved = existing();
        saved.title = "T2".into();
        let outcome = form.complete_save(Ok(Some(saved)));

        assert_eq!(
            outcome,
            SaveOutcome::Updated {
                post: form.original.clone().unwrap(),
                navigate_to: "/blog/1".into(),
            }
        );
        assert!(!form.has_changes());
    }

    #[test]
    fn failed_save_keeps_fields_and_allows_retry() {
        let mut form = filled_create_form();
        form.submit();
        form.confirm_save().unwrap();

        let outcome = form.complete_save(Err(ClientError::GraphQl {
            message: "boom".into(),
            code: None,
        }));

        assert_eq!(outcome, SaveOutcome::Failed);
        assert_eq!(form.state(), FormState::SaveFailed);
        assert_eq!(form.error(), Some(SAVE_FAILED_MESSAGE));
        assert_eq!(form.draft().title, "T");

        assert!(form.submit().is_some());
        form.confirm_save().unwrap();
        assert_eq!(form.error(), None);
    }

    #[test]
    fn confirm_without_prompt_is_rejected() {
        let mut form = filled_create_form();
        assert!(matches!(
            form.confirm_save(),
            Err(ClientError::InvalidState(_))
        ));
    }

    #[test]
    fn navigation_is_blocked_while_dirty() {
        let mut form = PostForm::edit(existing());
        assert_eq!(
            form.request_navigation("/blog"),
            Navigation::Proceed("/blog".into())
        );

        form.set_author("Someone else");
        assert_eq!(form.request_navigation("/blog"), Navigation::Blocked);
        assert_eq!(form.leave_prompt(), Some(LEAVE_PROMPT));

        form.cancel_leave();
        assert_eq!(form.leave_prompt(), None);
        assert_eq!(form.confirm_leave(), None);
        assert_eq!(form.draft().author, "Someone else");
        assert_eq!(form.state(), FormState::Dirty);
    }

    #[test]
    fn leave_without_prompt_keeps_edits() {
        let mut form = PostForm::edit(existing());
        form.set_title("Unsaved edit");

        assert_eq!(form.confirm_leave(), None);
        assert_eq!(form.draft().title, "Unsaved edit");
        assert_eq!(form.state(), FormState::Dirty);
    }

    #[test]
    fn stray_leave_does_not_break_an_accepted_save() {
        let mut form = PostForm::edit(existing());
        form.set_title("T2");
        form.submit();
        form.confirm_save().unwrap();

        assert_eq!(form.confirm_leave(), None);
        assert_eq!(form.state(), FormState::Saving);

        let mut saved = existing();
        saved.title = "T2".into();
        let outcome = form.complete_save(Ok(Some(saved)));
        assert!(matches!(outcome, SaveOutcome::Updated { .. }));
        assert_eq!(form.state(), FormState::Clean);
    }

    #[test]
    fn confirming_leave_discards_changes() {
        let mut form = PostForm::edit(existing());
        form.set_author("Someone else");
        form.request_navigation("/blog");

        assert_eq!(form.confirm_leave(), Some("/blog".into()));
        assert_eq!(form.draft().author, "A");
        assert_eq!(form.state(), FormState::Clean);
        assert_eq!(
            form.request_navigation("/blog"),
            Navigation::Proceed("/blog".into())
        );
    }

    #[test]
    fn navigation_is_allowed_while_saving() {
        let mut form = filled_create_form();
        form.submit();
        form.confirm_save().unwrap();
        assert_eq!(
            form.request_navigation("/blog"),
            Navigation::Proceed("/blog".into())
        );
    }
}
