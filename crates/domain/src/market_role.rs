// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::error::DomainError;
use crate::ids::GridAreaId;
use std::collections::BTreeSet;

code_enum! {
    /// The function an actor performs in the energy market.
    pub enum EicFunction {
        BalanceResponsibleParty => "BalanceResponsibleParty",
        BillingAgent => "BillingAgent",
        EnergySupplier => "EnergySupplier",
        GridAccessProvider => "GridAccessProvider",
        ImbalanceSettlementResponsible => "ImbalanceSettlementResponsible",
        MeterOperator => "MeterOperator",
        MeteredDataAdministrator => "MeteredDataAdministrator",
        MeteredDataResponsible => "MeteredDataResponsible",
        MeteringPointAdministrator => "MeteringPointAdministrator",
        SystemOperator => "SystemOperator",
        DanishEnergyAgency => "DanishEnergyAgency",
        DataHubAdministrator => "DataHubAdministrator",
        IndependentAggregator => "IndependentAggregator",
        SerialEnergyTrader => "SerialEnergyTrader",
        Delegated => "Delegated",
        ItSupplier => "ItSupplier",
    }
}

impl EicFunction {
    /// Whether grid areas held under this function are globally exclusive.
    #[must_use]
    pub const fn reserves_grid_areas(&self) -> bool {
        matches!(self, Self::GridAccessProvider)
    }

    /// Whether several actors with the same actor number may hold this function.
    #[must_use]
    pub const fn may_overlap(&self) -> bool {
        matches!(self, Self::DataHubAdministrator)
    }
}

code_enum! {
    /// Metering point types an actor may handle within a grid area.
    pub enum MeteringPointType {
        D01VeProduction => "D01",
        D02Analysis => "D02",
        D03NotUsed => "D03",
        D04SurplusProductionGroup6 => "D04",
        D05NetProduction => "D05",
        D06SupplyToGrid => "D06",
        D07ConsumptionFromGrid => "D07",
        D08WholeSaleServicesInformation => "D08",
        D09OwnProduction => "D09",
        D10NetFromGrid => "D10",
        D11NetToGrid => "D11",
        D12TotalConsumption => "D12",
        D13NetLossCorrection => "D13",
        D14ElectricalHeating => "D14",
        D15NetConsumption => "D15",
        D17OtherConsumption => "D17",
        D18OtherProduction => "D18",
        D19CapacitySettlement => "D19",
        D20ExchangeReactiveEnergy => "D20",
        D21CollectiveNetProduction => "D21",
        D22CollectiveNetConsumption => "D22",
        D99InternalUse => "D99",
        E17Consumption => "E17",
        E18Production => "E18",
        E20Exchange => "E20",
    }
}

/// A grid area held by an actor, with the metering point types it covers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActorGridArea {
    /// The grid area.
    pub grid_area_id: GridAreaId,
    /// Metering point types handled in the grid area.
    pub metering_point_types: BTreeSet<MeteringPointType>,
}

impl ActorGridArea {
    /// Creates a grid area assignment.
    #[must_use]
    pub fn new(
        grid_area_id: GridAreaId,
        metering_point_types: impl IntoIterator<Item = MeteringPointType>,
    ) -> Self {
        Self {
            grid_area_id,
            metering_point_types: metering_point_types.into_iter().collect(),
        }
    }
}

/// The market role of an actor: one function and its grid areas.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActorMarketRole {
    function: EicFunction,
    grid_areas: Vec<ActorGridArea>,
    comment: Option<String>,
}

impl ActorMarketRole {
    /// Creates a market role.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::DuplicateGridArea` if a grid area is listed twice.
    pub fn new(
        function: EicFunction,
        grid_areas: Vec<ActorGridArea>,
        comment: Option<String>,
    ) -> Result<Self, DomainError> {
        let mut seen: BTreeSet<GridAreaId> = BTreeSet::new();
        for grid_area in &grid_areas {
            if !seen.insert(grid_area.grid_area_id) {
                return Err(DomainError::DuplicateGridArea(grid_area.grid_area_id));
            }
        }

        Ok(Self {
            function,
            grid_areas,
            comment,
        })
    }

    /// Creates a market role without grid areas.
    #[must_use]
    pub const fn without_grid_areas(function: EicFunction) -> Self {
        Self {
            function,
            grid_areas: Vec::new(),
            comment: None,
        }
    }

    /// Returns the function.
    #[must_use]
    pub const fn function(&self) -> EicFunction {
        self.function
    }

    /// Returns the grid areas in assignment order.
    #[must_use]
    pub fn grid_areas(&self) -> &[ActorGridArea] {
        &self.grid_areas
    }

    /// Returns the free-text comment.
    #[must_use]
    pub fn comment(&self) -> Option<&str> {
        self.comment.as_deref()
    }

    /// Looks up a grid area assignment.
    #[must_use]
    pub fn grid_area(&self, grid_area_id: GridAreaId) -> Option<&ActorGridArea> {
        self.grid_areas
            .iter()
            .find(|grid_area| grid_area.grid_area_id == grid_area_id)
    }

    /// Merges a grid area into the role.
    ///
    /// Metering point types of an already present grid area are unioned.
    /// Returns `true` if the grid area was not held before.
    pub fn merge_grid_area(&mut self, incoming: ActorGridArea) -> bool {
        if let Some(existing) = self
            .grid_areas
            .iter_mut()
            .find(|grid_area| grid_area.grid_area_id == incoming.grid_area_id)
        {
            existing
                .metering_point_types
                .extend(incoming.metering_point_types);
            return false;
        }

        self.grid_areas.push(incoming);
        true
    }

    /// Removes and returns every grid area.
    pub fn take_grid_areas(&mut self) -> Vec<ActorGridArea> {
        std::mem::take(&mut self.grid_areas)
    }
}
