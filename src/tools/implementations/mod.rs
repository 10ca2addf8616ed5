// ABOUTME: Operation implementations invoked by the dispatcher
// ABOUTME: Analytics aggregations and user management over the backend data client
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

/// User and payment analytics
pub mod analytics;
/// User list, update, and delete
pub mod users;
