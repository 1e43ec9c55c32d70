// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::{
    Actor, ActorGridArea, ActorMarketRole, ActorName, ActorNumber, Address,
    BusinessRegisterIdentifier, EicFunction, GridAreaId, MeteringPointType, Organization,
    OrganizationDomain, OrganizationId,
};
use time::OffsetDateTime;
use time::macros::datetime;

pub fn test_instant() -> OffsetDateTime {
    datetime!(2026-03-01 00:00 UTC)
}

pub fn create_test_organization(name: &str, cvr: &str) -> Organization {
    Organization::new(
        name,
        BusinessRegisterIdentifier::new(cvr).unwrap(),
        Address {
            country: String::from("DK"),
            ..Address::default()
        },
        vec![OrganizationDomain::new("test.dk").unwrap()],
    )
    .unwrap()
}

pub fn create_test_actor(
    organization_id: OrganizationId,
    actor_number: &str,
    function: EicFunction,
    grid_areas: Vec<ActorGridArea>,
) -> Actor {
    Actor::new(
        organization_id,
        ActorNumber::new(actor_number).unwrap(),
        ActorName::new("Test Actor").unwrap(),
        ActorMarketRole::new(function, grid_areas, None).unwrap(),
    )
}

pub fn grid_area_with(
    grid_area_id: GridAreaId,
    metering_point_types: &[MeteringPointType],
) -> ActorGridArea {
    ActorGridArea::new(grid_area_id, metering_point_types.iter().copied())
}
