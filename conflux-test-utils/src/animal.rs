// Copyright 2025 The Conflux Authors
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use std::fmt::{self, Display};

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct Animal {
    pub species: String,
}

impl Animal {
    #[must_use]
    pub const fn new(species: String) -> Self {
        Self { species }
    }
}

impl Display for Animal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Animal[species={}]", self.species)
    }
}

#[must_use]
pub fn animal_cat() -> Animal {
    Animal::new("Cat".to_string())
}

#[must_use]
pub fn animal_dog() -> Animal {
    Animal::new("Dog".to_string())
}
