//! Frame pipeline steps.
//!
//! Each step is a free function over the arena rosters, the double-buffered
//! index and the balance config. [`crate::simulation::Simulation::step`]
//! runs them in this order:
//!
//! 1. [`consumables::use_consumable`] for a click this frame
//! 2. [`consumables::process_flares`]
//! 3. [`consumables::process_grenades`]
//! 4. [`projectiles::process_projectiles`]
//! 5. [`spawning::spawn_enemy`] when the [`spawning::SpawnTimer`] is due
//! 6. [`enemies::process_enemies`]
//! 7. [`enemies::cleanup_dead_enemies`]
//! 8. [`soldiers::cleanup_dead_soldiers`]
//! 9. [`soldiers::process_soldiers`]
//!
//! Steps 2-4, 6 and 9 insert their survivors into the current index, so
//! later steps see everything earlier steps placed this frame.

pub mod consumables;
pub mod enemies;
pub mod projectiles;
pub mod soldiers;
pub mod spawning;

pub use consumables::{process_flares, process_grenades, use_consumable};
pub use enemies::{cleanup_dead_enemies, process_enemies};
pub use projectiles::process_projectiles;
pub use soldiers::{cleanup_dead_soldiers, process_soldiers};
pub use spawning::{spawn_enemy, SpawnOutcome, SpawnTimer};
