// Copyright 2025 the Runebender Xilem Authors
// SPDX-License-Identifier: Apache-2.0

//! Engine settings and configuration constants.
//!
//! These values tune the geometric heuristics of the morph engine. They are
//! compile-time constants; nothing here is persisted.

// ============================================================================
// GEOMETRY SETTINGS
// ============================================================================
/// Two points closer than this are treated as coincident (design units)
const COINCIDENCE_EPSILON: f64 = 1e-9;

// ============================================================================
// POLE OF INACCESSIBILITY SETTINGS
// ============================================================================
// Both values are ratios of the largest bounding-box dimension of the
// subpath, so tiny 24x24 icons and large artboards get the same relative
// quality.

/// Search stops once no cell can improve the best distance by more than
/// this fraction of the subpath extent
const POLE_PRECISION_RATIO: f64 = 1e-3;

/// Curve flattening tolerance used to turn a subpath into a polygon
const POLE_FLATTEN_RATIO: f64 = 1e-3;

// ============================================================================
// AUTO FIX SETTINGS
// ============================================================================
/// Alignment penalty for a reference point left without a partner.
///
/// Zero means "splitting the shorter subpath is free", so the alignment is
/// driven purely by endpoint displacement.
const AUTOFIX_GAP_PENALTY: f64 = 0.0;

// ============================================================================
// PUBLIC API - Don't edit below this line unless you know what you're doing
// ============================================================================

/// Geometric tolerances
pub mod geometry {
    /// Coincidence tolerance for points (design units)
    pub const EPSILON: f64 = super::COINCIDENCE_EPSILON;
}

/// Pole of inaccessibility search settings
pub mod pole {
    /// Search precision, relative to the subpath extent
    pub const PRECISION_RATIO: f64 = super::POLE_PRECISION_RATIO;

    /// Flattening tolerance, relative to the subpath extent
    pub const FLATTEN_RATIO: f64 = super::POLE_FLATTEN_RATIO;
}

/// Auto fix alignment settings
pub mod autofix {
    /// Penalty for an unmatched reference point
    pub const GAP_PENALTY: f64 = super::AUTOFIX_GAP_PENALTY;
}
