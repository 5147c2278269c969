#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum GameMode {
    #[default]
    Soccar,
    Hoops,
    Heatseeker,
    Snowday,
    Dropshot,
    /// Soccar without goals, boost pads, or any arena geometry. Cars and
    /// the ball fall forever.
    TheVoid,
}

impl GameMode {
    const NAMES: [&'static str; 6] = [
        "soccar",
        "hoops",
        "heatseeker",
        "snowday",
        "dropshot",
        "void",
    ];

    #[must_use]
    pub const fn name(self) -> &'static str {
        Self::NAMES[self as usize]
    }

    /// Modes with soccar-style goals at the Y extents.
    #[must_use]
    pub const fn has_soccar_goals(self) -> bool {
        matches!(self, Self::Soccar | Self::Heatseeker | Self::Snowday)
    }

    /// Whether goal detection exists at all in this mode.
    #[must_use]
    pub const fn has_goals(self) -> bool {
        !matches!(self, Self::TheVoid)
    }

    /// Whether the mode spawns boost pads.
    #[must_use]
    pub const fn has_boost_pads(self) -> bool {
        !matches!(self, Self::TheVoid | Self::Dropshot)
    }
}

impl TryFrom<u8> for GameMode {
    type Error = ();

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Self::Soccar),
            1 => Ok(Self::Hoops),
            2 => Ok(Self::Heatseeker),
            3 => Ok(Self::Snowday),
            4 => Ok(Self::Dropshot),
            5 => Ok(Self::TheVoid),
            _ => Err(()),
        }
    }
}
