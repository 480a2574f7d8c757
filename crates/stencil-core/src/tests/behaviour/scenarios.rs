//! Scenario bindings for the `stencil-core` BDD feature file.
//!
//! These functions bind Gherkin scenario names to the step definitions in
//! the parent module.

use std::cell::RefCell;

use rstest::fixture;
use rstest_bdd_macros::scenario;

use super::TestWorld;

/// Fixture providing the shared BDD world.
#[fixture]
fn world() -> RefCell<TestWorld> {
    super::world()
}

#[scenario(
    path = "tests/features/stencil_core.feature",
    name = "Scanning a block body"
)]
fn scanning_block_body(world: RefCell<TestWorld>) {
    let _ = world;
}

#[scenario(
    path = "tests/features/stencil_core.feature",
    name = "Scanning a terminated body"
)]
fn scanning_terminated_body(world: RefCell<TestWorld>) {
    let _ = world;
}

#[scenario(
    path = "tests/features/stencil_core.feature",
    name = "Deriving a forward insert variant"
)]
fn deriving_forward_insert(world: RefCell<TestWorld>) {
    let _ = world;
}

#[scenario(
    path = "tests/features/stencil_core.feature",
    name = "Deriving a front insert variant"
)]
fn deriving_front_insert(world: RefCell<TestWorld>) {
    let _ = world;
}

#[scenario(
    path = "tests/features/stencil_core.feature",
    name = "Unknown methods pass through"
)]
fn unknown_methods_pass_through(world: RefCell<TestWorld>) {
    let _ = world;
}

#[scenario(
    path = "tests/features/stencil_core.feature",
    name = "Specialisation fails without a template"
)]
fn specialisation_fails_without_template(world: RefCell<TestWorld>) {
    let _ = world;
}
