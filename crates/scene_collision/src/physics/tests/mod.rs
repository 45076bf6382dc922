//! Integration tests for the collision shapes and the picking world
