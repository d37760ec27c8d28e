//! Two-phase offense removal
//!
//! Nobody deletes an offense directly. A deletion request is submitted
//! first, carrying a snapshot of the offense and a mandatory reason,
//! and the offense is flagged so no second request can pile on. A
//! superadmin then approves (offense removed) or rejects (flag
//! cleared, offense requestable again). Both phases are conditional
//! writes, so concurrent submissions or double resolutions lose
//! cleanly instead of corrupting state.

use crate::access::{self, Action};
use crate::audit;
use crate::error::{BusinessError, BusinessResult};
use crate::services::ServiceContext;
use serde_json::json;
use trafdesk_core::{
    AuditAction, Decision, DeletionRequest, Offense, RequestStatus, User,
};
use trafdesk_persistence::{
    DeletionRequestRepo, OffenseRepo, PersistenceError, UserRepo,
};

/// A deletion request expanded for review: who asked, and whether the
/// offense still exists.
#[derive(Debug, Clone)]
pub struct DeletionRequestView {
    pub request: DeletionRequest,
    /// None when the requesting account no longer exists
    pub requester_name: Option<String>,
    pub requester_email: Option<String>,
    /// None once the offense has been deleted; the snapshot inside
    /// `request` still describes it
    pub offense: Option<Offense>,
}

/// Deletion Service - the request/approve workflow around offense removal
pub struct DeletionService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> DeletionService<'a> {
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Submit a deletion request for an offense.
    ///
    /// Officers and superadmins may request deletion of any offense;
    /// drivers only of their own. At most one pending request per
    /// offense: the flag on the offense row is taken with a
    /// conditional write, so of two concurrent submissions exactly one
    /// succeeds.
    pub async fn submit(
        &self,
        actor: &User,
        offense_id: &str,
        reason: &str,
        ip: Option<&str>,
    ) -> BusinessResult<DeletionRequest> {
        let offense = OffenseRepo::find_by_id(self.ctx.pool(), offense_id)
            .await?
            .ok_or_else(|| BusinessError::not_found("Offense", offense_id))?;
        access::ensure_can_request_deletion(actor, &offense)?;

        let request = DeletionRequest::new(&offense, &actor.id, reason)?;

        let mut tx = self.ctx.pool().begin().await.map_err(PersistenceError::from)?;
        let flagged =
            OffenseRepo::mark_deletion_requested(&mut *tx, offense_id, &actor.id, reason)
                .await?;
        if !flagged {
            return Err(BusinessError::Conflict(format!(
                "Offense {offense_id} already has a pending deletion request"
            )));
        }
        DeletionRequestRepo::insert(&mut *tx, &request).await?;
        audit::record(
            &mut *tx,
            &actor.id,
            AuditAction::DeletionRequested,
            json!({
                "requestId": request.id,
                "offenseId": offense_id,
                "reason": reason,
                "requestedBy": actor.email,
            }),
            ip,
        )
        .await?;
        tx.commit().await.map_err(PersistenceError::from)?;

        tracing::info!(
            request_id = %request.id,
            offense_id,
            requested_by = %actor.email,
            "deletion request submitted"
        );
        Ok(request)
    }

    /// Resolve a pending request. Superadmin only.
    ///
    /// Approval deletes the offense for good; the request row and its
    /// snapshot survive as the record of what was removed, and any
    /// payments against the offense are retained. Rejection clears the
    /// offense's flag so it can be requested again. Either way the
    /// stored status moves off `pending` with a conditional write, so
    /// a request resolves exactly once.
    pub async fn resolve(
        &self,
        actor: &User,
        request_id: &str,
        decision: &str,
        ip: Option<&str>,
    ) -> BusinessResult<DeletionRequest> {
        access::ensure(actor, Action::ResolveDeletion)?;
        let decision = Decision::parse(decision)?;

        let mut request = DeletionRequestRepo::get_by_id(self.ctx.pool(), request_id).await?;

        let mut tx = self.ctx.pool().begin().await.map_err(PersistenceError::from)?;
        let moved =
            DeletionRequestRepo::resolve(&mut *tx, request_id, decision.into()).await?;
        if !moved {
            return Err(BusinessError::Conflict(format!(
                "Deletion request {request_id} has already been processed"
            )));
        }

        match decision {
            Decision::Approved => {
                OffenseRepo::delete(&mut *tx, &request.offense_id).await?;
                // One entry per resolution; the deleted offense is
                // described by the snapshot in the payload
                audit::record(
                    &mut *tx,
                    &actor.id,
                    AuditAction::ApprovedDeletionRequest,
                    json!({
                        "requestId": request_id,
                        "offenseId": request.offense_id,
                        "offenseDeleted": true,
                        "snapshot": serde_json::to_value(&request.snapshot)
                            .map_err(PersistenceError::from)?,
                        "resolvedBy": actor.email,
                    }),
                    ip,
                )
                .await?;
            }
            Decision::Rejected => {
                OffenseRepo::clear_deletion_requested(&mut *tx, &request.offense_id).await?;
                audit::record(
                    &mut *tx,
                    &actor.id,
                    AuditAction::RejectedDeletionRequest,
                    json!({
                        "requestId": request_id,
                        "offenseId": request.offense_id,
                        "resolvedBy": actor.email,
                    }),
                    ip,
                )
                .await?;
            }
        }
        tx.commit().await.map_err(PersistenceError::from)?;

        request.status = decision.into();
        tracing::info!(
            request_id,
            decision = decision.as_str(),
            resolved_by = %actor.email,
            "deletion request resolved"
        );
        Ok(request)
    }

    /// List requests for the review queue, newest first. Superadmin
    /// only.
    pub async fn list(&self, actor: &User) -> BusinessResult<Vec<DeletionRequestView>> {
        access::ensure(actor, Action::ViewDeletionQueue)?;

        let requests = DeletionRequestRepo::list_all(self.ctx.pool()).await?;
        let mut views = Vec::with_capacity(requests.len());
        for request in requests {
            let requester = match UserRepo::get_by_id(self.ctx.pool(), &request.requested_by).await
            {
                Ok(user) => Some(user),
                Err(e) if e.is_not_found() => None,
                Err(e) => return Err(e.into()),
            };
            let offense = OffenseRepo::find_by_id(self.ctx.pool(), &request.offense_id).await?;
            views.push(DeletionRequestView {
                requester_name: requester.as_ref().map(|u| u.name.clone()),
                requester_email: requester.map(|u| u.email),
                offense,
                request,
            });
        }
        Ok(views)
    }

    /// List only pending requests, newest first. Superadmin only.
    pub async fn list_pending(&self, actor: &User) -> BusinessResult<Vec<DeletionRequest>> {
        access::ensure(actor, Action::ViewDeletionQueue)?;
        Ok(DeletionRequestRepo::list_by_status(self.ctx.pool(), RequestStatus::Pending).await?)
    }
}
