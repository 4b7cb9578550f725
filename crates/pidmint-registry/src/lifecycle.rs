//! Identifier lifecycle orchestration
//!
//! The state machine behind a registration run. The initial state is
//! derived from the document (an existing identifier means update, none
//! means create), the call sequence per branch is produced by pure planner
//! functions, and [`Registrar`] drives the plan over the transport:
//!
//! - create: `POST metadata/{id}`, then either stop at the draft state or
//!   promote with `PUT doi/{id}`, then persist the identifier into the
//!   document. A failed promotion persists nothing.
//! - update: `PUT metadata/{id}`, check findability with `GET doi/{id}`,
//!   and promote when the identifier should be findable but is not. The
//!   stored identifier is never touched on this branch.
//!
//! The draft flag caps a run at the draft state; clearing it makes the
//! next update run promote.

use pidmint_core::{
    extract_fields, DocumentInfo, Pid, PidState, PidStore, PidmintConfig, Record, TemplateResolver,
};

use crate::error::{RegistryError, Result};
use crate::transform::{write_snapshot, SchemaTransformer, SNAPSHOT_IN, SNAPSHOT_OUT};
use crate::transport::{RegistryClient, RegistryResponse};

/// Status the registry answers with when it accepted a write.
const ACCEPTED_STATUS: u16 = 201;
/// Status signalling a publicly resolvable identifier on `GET doi/{id}`.
const FINDABLE_STATUS: u16 = 200;

/// States of the identifier lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleState {
    /// The document carries no identifier yet
    NoIdentifier,
    /// Registered with the registry, not publicly resolvable
    Drafted,
    /// Publicly resolvable
    Findable,
    /// An already-registered identifier is being revisited
    UpdatePending,
}

/// The remote and local operations a branch performs, in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegistryCall {
    PostMetadata,
    PutMetadata,
    CheckFindable,
    PutDoi,
    PersistPid,
}

/// Derive the initial lifecycle state from the document.
pub fn classify(document: &DocumentInfo) -> LifecycleState {
    if document.current_pid().is_some() {
        LifecycleState::UpdatePending
    } else {
        LifecycleState::NoIdentifier
    }
}

/// Call sequence for a document without an identifier.
pub fn plan_create(draft: bool) -> Vec<RegistryCall> {
    if draft {
        vec![RegistryCall::PostMetadata, RegistryCall::PersistPid]
    } else {
        vec![
            RegistryCall::PostMetadata,
            RegistryCall::PutDoi,
            RegistryCall::PersistPid,
        ]
    }
}

/// Unconditional call sequence for a document with an identifier; whether a
/// promotion follows depends on [`needs_promotion`] over the findability
/// check's answer.
pub fn plan_update() -> Vec<RegistryCall> {
    vec![RegistryCall::PutMetadata, RegistryCall::CheckFindable]
}

/// A revisited identifier is promoted exactly when promotion is allowed
/// (draft mode off) and the registry does not resolve it yet.
pub fn needs_promotion(draft: bool, findable: bool) -> bool {
    !draft && !findable
}

/// What a successful run did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegistrationAction {
    Created,
    Updated,
}

/// Success outcome of a run.
#[derive(Debug, Clone)]
pub struct Registration {
    pub pid: Pid,
    pub state: PidState,
    pub action: RegistrationAction,
}

/// Drives one registration run: extract, build, transform, then the branch
/// of remote calls, and finally the at-most-one identifier write-back.
pub struct Registrar<C, T> {
    config: PidmintConfig,
    client: C,
    transformer: T,
}

impl<C: RegistryClient, T: SchemaTransformer> Registrar<C, T> {
    pub fn new(config: PidmintConfig, client: C, transformer: T) -> Self {
        Self {
            config,
            client,
            transformer,
        }
    }

    /// The registry client this registrar drives.
    pub fn client(&self) -> &C {
        &self.client
    }

    /// Run the full lifecycle for one document. A failed run leaves the
    /// document's identifier metadata exactly as it was.
    pub async fn run(
        &self,
        document: &DocumentInfo,
        resolver: &dyn TemplateResolver,
        store: &mut dyn PidStore,
    ) -> Result<Registration> {
        tracing::info!(catalogue_id = %document.catalogue_id, "identifier registration run started");

        let state = classify(document);
        let pid = match document.current_pid() {
            Some(existing) => Pid::new(existing),
            None => Pid::mint(&self.config.mint, &document.catalogue_id),
        };

        let fields = extract_fields(&self.config.fields, &self.config.repeat_separator, resolver)?;
        let record = Record::build(fields, document, &pid);
        let field_set = record.to_xml()?;
        self.snapshot(SNAPSHOT_IN, &field_set)?;
        let payload = self.transformer.transform(&field_set)?;
        self.snapshot(SNAPSHOT_OUT, &payload)?;

        let registration = match state {
            LifecycleState::NoIdentifier => self.create(&pid, payload, store).await?,
            _ => self.update(&pid, payload).await?,
        };

        self.probe_resolvability(&registration.pid).await;
        tracing::info!(pid = %registration.pid, state = ?registration.state,
            "identifier registration run finished");
        Ok(registration)
    }

    /// Branch A: register a new identifier. The identifier is written back
    /// only after every remote call succeeded; a failed promotion leaves no
    /// orphan identifier behind.
    async fn create(
        &self,
        pid: &Pid,
        payload: String,
        store: &mut dyn PidStore,
    ) -> Result<Registration> {
        let response = self.client.post_metadata(pid, payload).await?;
        ensure_accepted("metadata registration", pid, &response)?;

        let state = if self.config.mint.draft {
            PidState::Drafted
        } else {
            let response = self.client.put_doi(pid, self.resolution_payload(pid)).await?;
            ensure_accepted("identifier promotion", pid, &response)?;
            PidState::Findable
        };

        store.persist(pid)?;
        tracing::info!(pid = %pid, state = ?state, "new identifier registered");
        Ok(Registration {
            pid: pid.clone(),
            state,
            action: RegistrationAction::Created,
        })
    }

    /// Branch B: refresh metadata for an existing identifier and promote it
    /// when it should be findable but is not.
    async fn update(&self, pid: &Pid, payload: String) -> Result<Registration> {
        let response = self.client.put_metadata(pid, payload).await?;
        ensure_accepted("metadata update", pid, &response)?;

        let findable = self.client.get_doi(pid).await?.status == FINDABLE_STATUS;
        let state = if findable {
            PidState::Findable
        } else if needs_promotion(self.config.mint.draft, findable) {
            let response = self.client.put_doi(pid, self.resolution_payload(pid)).await?;
            ensure_accepted("identifier promotion", pid, &response)?;
            PidState::Findable
        } else {
            PidState::Drafted
        };

        tracing::info!(pid = %pid, state = ?state, "existing identifier updated");
        Ok(Registration {
            pid: pid.clone(),
            state,
            action: RegistrationAction::Updated,
        })
    }

    /// Resolution payload for `PUT doi/{id}`.
    fn resolution_payload(&self, pid: &Pid) -> String {
        format!("doi={pid}\nurl={viewer}{pid}", viewer = self.config.mint.viewer)
    }

    fn snapshot(&self, name: &str, document: &str) -> Result<()> {
        if !self.config.transform.debug_mode {
            return Ok(());
        }
        write_snapshot(&self.config.transform.snapshot_dir, name, document)
            .map_err(|e| RegistryError::Snapshot(e.to_string()))
    }

    /// Post-run diagnostics: ask the registry whether the identifier
    /// resolves. Never affects the outcome.
    async fn probe_resolvability(&self, pid: &Pid) {
        match self.client.get_doi(pid).await {
            Ok(response) => {
                tracing::debug!(pid = %pid, resolvable = response.status == FINDABLE_STATUS,
                    "post-run resolvability probe");
            }
            Err(error) => {
                tracing::debug!(pid = %pid, %error, "post-run resolvability probe failed");
            }
        }
    }
}

fn ensure_accepted(
    operation: &'static str,
    pid: &Pid,
    response: &RegistryResponse,
) -> Result<()> {
    if response.status == ACCEPTED_STATUS {
        Ok(())
    } else {
        Err(RegistryError::Rejected {
            operation,
            pid: pid.to_string(),
            status: response.status,
            body: response.body.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn document(existing_pid: Option<&str>) -> DocumentInfo {
        DocumentInfo {
            doc_type: "Monograph".to_string(),
            anchor_type: None,
            catalogue_id: "0042".to_string(),
            existing_pid: existing_pid.map(str::to_string),
        }
    }

    #[test]
    fn documents_without_identifier_classify_as_new() {
        assert_eq!(classify(&document(None)), LifecycleState::NoIdentifier);
        assert_eq!(classify(&document(Some("  "))), LifecycleState::NoIdentifier);
    }

    #[test]
    fn documents_with_identifier_classify_as_update() {
        assert_eq!(
            classify(&document(Some("10.5072/0042"))),
            LifecycleState::UpdatePending
        );
    }

    #[test]
    fn create_plan_in_draft_mode_skips_promotion() {
        assert_eq!(
            plan_create(true),
            vec![RegistryCall::PostMetadata, RegistryCall::PersistPid]
        );
    }

    #[test]
    fn create_plan_promotes_before_persisting() {
        assert_eq!(
            plan_create(false),
            vec![
                RegistryCall::PostMetadata,
                RegistryCall::PutDoi,
                RegistryCall::PersistPid
            ]
        );
    }

    #[test]
    fn update_plan_checks_findability_after_metadata() {
        assert_eq!(
            plan_update(),
            vec![RegistryCall::PutMetadata, RegistryCall::CheckFindable]
        );
    }

    // Only a non-draft run with a non-findable identifier promotes.
    #[rstest::rstest]
    #[case(false, false, true)]
    #[case(false, true, false)]
    #[case(true, false, false)]
    #[case(true, true, false)]
    fn promotion_matrix(#[case] draft: bool, #[case] findable: bool, #[case] expected: bool) {
        assert_eq!(needs_promotion(draft, findable), expected);
    }
}
