// Copyright 2025 the Runebender Xilem Authors
// SPDX-License-Identifier: Apache-2.0

//! Shapeshifter: make two vector paths morphable

fn main() -> anyhow::Result<()> {
    shapeshifter::run()
}
