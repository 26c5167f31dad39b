//! Full reporting flow: a citizen drops a pin, the router decides the
//! owning organization at creation time, and the backfill catches tickets
//! that predate routing.

use radar_core::{Coordinate, OrgCode, Organization, Ticket, TicketDraft};
use radar_routing::{BackfillJob, TicketRouter};
use radar_store::{MemoryStore, TicketStore};

fn org1() -> Organization {
    Organization::new("owner-1", "ORG1", "North Ward").with_territory(vec![
        Coordinate::new(49.0, -97.2),
        Coordinate::new(49.0, -97.0),
        Coordinate::new(49.2, -97.0),
        Coordinate::new(49.2, -97.2),
    ])
}

#[tokio::test]
async fn ticket_creation_routes_inside_territory() {
    let store = MemoryStore::new();
    store.add_organization(org1());
    let router = TicketRouter::new(store.clone());

    // Inside ORG1's square.
    let draft = TicketDraft::new(49.1, -97.1, "user-7").with_description("streetlight out");
    let routed = router.route_on_create(&draft).await.expect("route");
    assert_eq!(routed, Some(OrgCode::new("ORG1")));

    let ticket = Ticket::from_draft(draft, routed);
    store.create(&ticket).await.expect("create");

    let persisted = store.get(&ticket.id).await.expect("get").expect("present");
    assert_eq!(persisted.org_code, Some(OrgCode::new("ORG1")));

    // Outside every territory: accepted, just unrouted.
    let stray = TicketDraft::new(50.0, -97.1, "user-8");
    let routed = router.route_on_create(&stray).await.expect("route");
    assert_eq!(routed, None);
}

#[tokio::test]
async fn backfill_catches_pre_routing_tickets() {
    let store = MemoryStore::new();
    store.add_organization(org1());

    // A ticket created before routing existed.
    let legacy = Ticket::from_draft(TicketDraft::new(49.15, -97.05, "user-1"), None);
    store.create(&legacy).await.expect("create");

    let job = BackfillJob::new(store.clone(), store.clone());
    let summary = job.run().await.expect("run");
    assert_eq!(summary.updated, 1);

    let routed = store.get(&legacy.id).await.expect("get").expect("present");
    assert_eq!(routed.org_code, Some(OrgCode::new("ORG1")));

    // Nothing left to do.
    let summary = job.run().await.expect("second run");
    assert_eq!(summary.updated, 0);
}
