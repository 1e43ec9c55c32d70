// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::Persistence;
use mp_registry::{
    Command, CommandOutcome, ExternalIdentityProvider, NewActor, NewGridArea, NewOrganization,
    NewUserRole, StoreError, execute,
};
use mp_registry_audit::ChangedBy;
use mp_registry_domain::{
    ActorGridArea, ActorId, ActorMarketRole, ActorName, ActorNumber, ActorStatus, Address,
    BusinessRegisterIdentifier, EicFunction, EmailAddress, ExternalUserId, GridAreaCode,
    GridAreaId, GridAreaType, MeteringPointType, OrganizationDomain, OrganizationId, Permission,
    PriceAreaCode, UserIdentity, UserInvitation, UserRoleId,
};
use std::collections::BTreeSet;
use time::OffsetDateTime;
use time::macros::datetime;

/// Fixed "now" used by persistence tests.
pub fn test_instant() -> OffsetDateTime {
    datetime!(2026-03-01 00:00 UTC)
}

/// Executes a command as the system and returns its outcome.
pub fn run(persistence: &mut Persistence, command: Command) -> CommandOutcome {
    execute(persistence, command, ChangedBy::System, test_instant()).unwrap()
}

pub fn new_test_organization(name: &str, cvr: &str) -> NewOrganization {
    NewOrganization {
        name: name.to_string(),
        business_register_identifier: BusinessRegisterIdentifier::new(cvr).unwrap(),
        address: Address {
            street_name: Some(String::from("Tonne Kjærsvej")),
            number: Some(String::from("65")),
            zip_code: Some(String::from("7000")),
            city: Some(String::from("Fredericia")),
            country: String::from("DK"),
        },
        domains: vec![OrganizationDomain::new("test.dk").unwrap()],
    }
}

pub fn seed_organization(persistence: &mut Persistence, cvr: &str) -> OrganizationId {
    let outcome: CommandOutcome = run(
        persistence,
        Command::CreateOrganization(Box::new(new_test_organization("Test", cvr))),
    );
    let CommandOutcome::Organization(organization_id) = outcome else {
        panic!("Expected an organization outcome, got {outcome:?}");
    };
    organization_id
}

pub fn seed_grid_area(persistence: &mut Persistence, code: &str) -> GridAreaId {
    let outcome: CommandOutcome = run(
        persistence,
        Command::CreateGridArea(NewGridArea {
            name: format!("Grid area {code}"),
            code: GridAreaCode::new(code).unwrap(),
            price_area_code: PriceAreaCode::Dk1,
            grid_area_type: GridAreaType::Distribution,
            valid_from: datetime!(2020-01-01 00:00 UTC),
            valid_to: None,
        }),
    );
    let CommandOutcome::GridArea(grid_area_id) = outcome else {
        panic!("Expected a grid area outcome, got {outcome:?}");
    };
    grid_area_id
}

pub fn market_role(function: EicFunction, grid_area_ids: &[GridAreaId]) -> ActorMarketRole {
    let grid_areas: Vec<ActorGridArea> = grid_area_ids
        .iter()
        .map(|grid_area_id| {
            ActorGridArea::new(
                *grid_area_id,
                [
                    MeteringPointType::D01VeProduction,
                    MeteringPointType::E17Consumption,
                ],
            )
        })
        .collect();
    ActorMarketRole::new(function, grid_areas, None).unwrap()
}

pub fn new_test_actor(
    organization_id: OrganizationId,
    actor_number: &str,
    function: EicFunction,
    grid_area_ids: &[GridAreaId],
) -> NewActor {
    NewActor {
        organization_id,
        actor_number: ActorNumber::new(actor_number).unwrap(),
        name: ActorName::new("Test Actor").unwrap(),
        market_role: market_role(function, grid_area_ids),
    }
}

pub fn seed_actor(
    persistence: &mut Persistence,
    organization_id: OrganizationId,
    actor_number: &str,
    function: EicFunction,
    grid_area_ids: &[GridAreaId],
) -> ActorId {
    let outcome: CommandOutcome = run(
        persistence,
        Command::CreateActor(new_test_actor(
            organization_id,
            actor_number,
            function,
            grid_area_ids,
        )),
    );
    let CommandOutcome::Actor(actor_id) = outcome else {
        panic!("Expected an actor outcome, got {outcome:?}");
    };
    actor_id
}

pub fn seed_active_actor(
    persistence: &mut Persistence,
    organization_id: OrganizationId,
    actor_number: &str,
    function: EicFunction,
    grid_area_ids: &[GridAreaId],
) -> ActorId {
    let actor_id: ActorId = seed_actor(
        persistence,
        organization_id,
        actor_number,
        function,
        grid_area_ids,
    );
    run(
        persistence,
        Command::ChangeActorStatus {
            actor_id,
            status: ActorStatus::Active,
        },
    );
    actor_id
}

pub fn seed_user_role(
    persistence: &mut Persistence,
    name: &str,
    eic_function: EicFunction,
    permissions: &[Permission],
) -> UserRoleId {
    let outcome: CommandOutcome = run(
        persistence,
        Command::CreateUserRole(NewUserRole {
            name: name.to_string(),
            description: Some(format!("{name} description")),
            eic_function,
            permissions: permissions.iter().copied().collect::<BTreeSet<Permission>>(),
        }),
    );
    let CommandOutcome::UserRole(user_role_id) = outcome else {
        panic!("Expected a user role outcome, got {outcome:?}");
    };
    user_role_id
}

pub fn test_invitation(
    email: &str,
    assigned_actor: ActorId,
    assigned_roles: &[UserRoleId],
) -> UserInvitation {
    UserInvitation {
        email: EmailAddress::new(email).unwrap(),
        first_name: String::from("Test"),
        last_name: String::from("User"),
        phone_number: None,
        assigned_actor,
        assigned_roles: assigned_roles.iter().copied().collect(),
    }
}

/// An external directory that creates identities on request and remembers them.
#[derive(Debug, Default)]
pub struct RecordingDirectory {
    pub identities: Vec<UserIdentity>,
}

impl ExternalIdentityProvider for RecordingDirectory {
    fn find_user_identity_by_email(
        &mut self,
        email: &EmailAddress,
    ) -> Result<Option<UserIdentity>, StoreError> {
        Ok(self
            .identities
            .iter()
            .find(|identity| identity.email == *email)
            .cloned())
    }

    fn create_user_identity(
        &mut self,
        invitation: &UserInvitation,
    ) -> Result<ExternalUserId, StoreError> {
        let external_id: ExternalUserId = ExternalUserId::new();
        self.identities.push(UserIdentity {
            external_id,
            email: invitation.email.clone(),
            first_name: invitation.first_name.clone(),
            last_name: invitation.last_name.clone(),
            phone_number: invitation.phone_number.clone(),
        });
        Ok(external_id)
    }
}
