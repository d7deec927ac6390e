use actix_web::{FromRequest, HttpMessage};
use futures_util::future::{Ready, ready};
use serde::Serialize;
use tokio::sync::broadcast;
use uuid::Uuid;

use crate::{
    api::error,
    modules::{
        organization::scope::{OrgScope, ScopeFilter},
        user::schema::{UserEntity, UserRole},
    },
    utils::Claims,
};

/// Authenticated caller, built once per request by the authentication middleware.
#[derive(Debug, Clone)]
pub struct SessionContext {
    pub claims: Claims,
    pub profile: UserEntity,
    pub scope: OrgScope,
}

impl SessionContext {
    pub fn user_id(&self) -> Uuid {
        self.profile.id
    }

    pub fn role(&self) -> UserRole {
        self.profile.role
    }

    pub fn is_admin(&self) -> bool {
        self.profile.role.is_admin()
    }

    pub fn filter(&self) -> ScopeFilter {
        self.scope.filter(self.profile.id)
    }

    /// Same rule the scoped list queries apply: organization in scope, or owned by the caller.
    pub fn can_see(&self, org_id: Option<Uuid>, owner_id: Uuid) -> bool {
        self.filter().matches(org_id, owner_id)
    }
}

impl FromRequest for SessionContext {
    type Error = error::Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(
        req: &actix_web::HttpRequest,
        _payload: &mut actix_web::dev::Payload,
    ) -> Self::Future {
        let session = req
            .extensions()
            .get::<SessionContext>()
            .cloned()
            .ok_or_else(|| error::Error::unauthorized("Unauthorized"));
        ready(session)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum AuthEvent {
    SignedIn { user_id: Uuid, at: chrono::DateTime<chrono::Utc> },
    SignedOut { user_id: Uuid, at: chrono::DateTime<chrono::Utc> },
    ProfileUpdated { user_id: Uuid, at: chrono::DateTime<chrono::Utc> },
}

impl AuthEvent {
    pub fn user_id(&self) -> Uuid {
        match self {
            AuthEvent::SignedIn { user_id, .. }
            | AuthEvent::SignedOut { user_id, .. }
            | AuthEvent::ProfileUpdated { user_id, .. } => *user_id,
        }
    }
}

/// Write half of the auth-state channel. Not `Clone`: whoever owns it is the only publisher.
pub struct AuthEventWriter {
    tx: broadcast::Sender<AuthEvent>,
}

impl AuthEventWriter {
    /// Returns the number of subscribers that received the event.
    pub fn publish(&self, event: AuthEvent) -> usize {
        self.tx.send(event).unwrap_or(0)
    }
}

/// Read half of the auth-state channel; hand out clones to anything that listens.
#[derive(Clone)]
pub struct SessionHub {
    tx: broadcast::Sender<AuthEvent>,
}

impl SessionHub {
    pub fn channel(capacity: usize) -> (AuthEventWriter, SessionHub) {
        let (tx, _) = broadcast::channel(capacity.max(1));
        (AuthEventWriter { tx: tx.clone() }, SessionHub { tx })
    }

    pub fn subscribe(&self) -> broadcast::Receiver<AuthEvent> {
        self.tx.subscribe()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn subscribers_receive_published_events() {
        let (writer, hub) = SessionHub::channel(8);
        let mut first = hub.subscribe();
        let mut second = hub.clone().subscribe();
        let user_id = Uuid::now_v7();

        let delivered = writer.publish(AuthEvent::SignedIn { user_id, at: chrono::Utc::now() });

        assert_eq!(delivered, 2);
        assert_eq!(first.recv().await.unwrap().user_id(), user_id);
        assert!(matches!(second.recv().await.unwrap(), AuthEvent::SignedIn { .. }));
    }

    #[test]
    fn publishing_without_subscribers_is_a_no_op() {
        let (writer, _hub) = SessionHub::channel(8);
        let event = AuthEvent::SignedOut { user_id: Uuid::now_v7(), at: chrono::Utc::now() };
        let delivered = writer.publish(event);
        assert_eq!(delivered, 0);
    }

    #[test]
    fn events_serialize_with_tag() {
        let event = AuthEvent::ProfileUpdated { user_id: Uuid::nil(), at: chrono::Utc::now() };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["event"], "profile_updated");
        assert_eq!(json["user_id"], Uuid::nil().to_string());
    }
}
