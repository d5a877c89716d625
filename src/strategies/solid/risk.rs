use log::debug;

use super::world::World;
use crate::arena::types::Direction::{self, Down, Left, Right, Up};

/// A spot relative to our head where a foe head is a threat, unless the
/// foe is heading in the `safe` direction. `None` means no heading is safe.
struct RiskSpot {
    dx:   i64,
    dy:   i64,
    safe: Option<Direction>,
}

const fn spot(dx: i64, dy: i64, safe: Option<Direction>) -> RiskSpot {
    RiskSpot { dx, dy, safe }
}

static HIGH_RISK_LEFT: [RiskSpot; 3] = [
    spot(-2, 0, Some(Left)),
    spot(-1, 1, Some(Down)),
    spot(-1, -1, Some(Up)),
];
static HIGH_RISK_RIGHT: [RiskSpot; 3] = [
    spot(2, 0, Some(Right)),
    spot(1, 1, Some(Down)),
    spot(1, -1, Some(Up)),
];
static HIGH_RISK_DOWN: [RiskSpot; 3] = [
    spot(-1, 1, Some(Left)),
    spot(1, 1, Some(Right)),
    spot(0, 2, Some(Down)),
];
static HIGH_RISK_UP: [RiskSpot; 3] = [
    spot(-1, -1, Some(Left)),
    spot(1, -1, Some(Right)),
    spot(0, -2, Some(Up)),
];

static LOW_RISK_LEFT: [RiskSpot; 5] = [
    spot(-3, 0, Some(Left)),
    spot(-2, 1, None),
    spot(-2, -1, None),
    spot(-1, -2, Some(Up)),
    spot(-1, 2, Some(Down)),
];
static LOW_RISK_RIGHT: [RiskSpot; 5] = [
    spot(3, 0, Some(Right)),
    spot(2, 1, None),
    spot(2, -1, None),
    spot(1, -2, Some(Up)),
    spot(1, 2, Some(Down)),
];
static LOW_RISK_DOWN: [RiskSpot; 5] = [
    spot(0, 3, Some(Down)),
    spot(-2, 1, Some(Left)),
    spot(2, 1, Some(Right)),
    spot(1, 2, None),
    spot(-1, 2, None),
];
static LOW_RISK_UP: [RiskSpot; 5] = [
    spot(0, -3, Some(Up)),
    spot(-2, -1, Some(Left)),
    spot(2, -1, Some(Right)),
    spot(1, -2, None),
    spot(-1, -2, None),
];

const HIGH_RISK_WEIGHT: i64 = 3;

fn high_risk_spots(direction: Direction) -> &'static [RiskSpot] {
    match direction {
        Left => &HIGH_RISK_LEFT,
        Right => &HIGH_RISK_RIGHT,
        Down => &HIGH_RISK_DOWN,
        Up => &HIGH_RISK_UP,
    }
}

fn low_risk_spots(direction: Direction) -> &'static [RiskSpot] {
    match direction {
        Left => &LOW_RISK_LEFT,
        Right => &LOW_RISK_RIGHT,
        Down => &LOW_RISK_DOWN,
        Up => &LOW_RISK_UP,
    }
}

/// Number of foe heads sitting on one of `spots` without a safe heading.
fn count_threats(world: &World, spots: &[RiskSpot]) -> i64 {
    let head = world.you.head();
    let mut threats = 0;
    for foe in &world.foes {
        for spot in spots {
            if foe.head() == head.translate(spot.dx, spot.dy)
                && spot.safe != Some(foe.heading)
            {
                threats += 1;
            }
        }
    }
    threats
}

pub fn high_risk(world: &World, direction: Direction) -> i64 {
    let threats = count_threats(world, high_risk_spots(direction));
    if threats > 0 {
        debug!("high risk of collision going {direction}: {threats}");
    }
    threats
}

pub fn low_risk(world: &World, direction: Direction) -> i64 {
    let threats = count_threats(world, low_risk_spots(direction));
    if threats > 0 {
        debug!("low risk of collision going {direction}: {threats}");
    }
    threats
}

/// Weighted count of foe heads threatening a collision if we go
/// `direction`.
pub fn collision_risk(world: &World, direction: Direction) -> i64 {
    HIGH_RISK_WEIGHT * high_risk(world, direction) + low_risk(world, direction)
}
