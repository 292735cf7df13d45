// Copyright 2025 the Runebender Xilem Authors
// SPDX-License-Identifier: Apache-2.0

//! Command kind conversion for one subpath pair.

use super::PathPair;
use crate::path::Path;

/// Make the command kinds of subpath `sub_idx` agree on both sides.
///
/// At every position where the kinds differ, the simpler command is
/// promoted to the richer kind (close to line, line to curve). Promotion
/// never changes the drawn geometry. Pairs with different command counts,
/// or an index missing on either side, are returned unchanged.
pub fn auto_convert(sub_idx: usize, from: &Path, to: &Path) -> PathPair {
    let (Some(from_sub), Some(to_sub)) = (from.sub_path(sub_idx), to.sub_path(sub_idx)) else {
        return PathPair::new(from.clone(), to.clone());
    };
    if from_sub.len() != to_sub.len() {
        return PathPair::new(from.clone(), to.clone());
    }

    let mut from_mutator = from.mutate();
    let mut to_mutator = to.mutate();
    for (cmd_idx, (a, b)) in from_sub.commands().iter().zip(to_sub.commands()).enumerate() {
        let (ka, kb) = (a.kind(), b.kind());
        if ka == kb {
            continue;
        }
        let converted = if ka.can_convert_to(kb) {
            from_mutator.convert_command(sub_idx, cmd_idx, kb).map(|_| ())
        } else if kb.can_convert_to(ka) {
            to_mutator.convert_command(sub_idx, cmd_idx, ka).map(|_| ())
        } else {
            Ok(())
        };
        if let Err(err) = converted {
            tracing::debug!(sub_idx, cmd_idx, %err, "command pair left unconverted");
        }
    }

    PathPair::new(from_mutator.build(), to_mutator.build())
}
