//! Connected controller descriptors, as handed over by the frontend.
//!
//! The launcher only forwards these to SDL through the environment; mapping
//! semantics live entirely in the emulator.

use std::str::FromStr;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Controller {
    pub index: u32,
    pub guid: String,
    pub name: String,
    pub device_path: String,
    pub buttons: u32,
    pub hats: u32,
    pub axes: u32,
}

impl FromStr for Controller {
    type Err = String;

    /// Parses `index:guid:name:devicepath[:buttons[:hats[:axes]]]`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let fields: Vec<&str> = s.split(':').collect();
        if fields.len() < 4 {
            return Err(format!(
                "expected index:guid:name:devicepath[:buttons[:hats[:axes]]], got {s:?}"
            ));
        }
        let number = |i: usize, what: &str| -> Result<u32, String> {
            match fields.get(i) {
                None => Ok(0),
                Some(raw) => raw.parse().map_err(|_| format!("invalid {what} {raw:?}")),
            }
        };
        Ok(Self {
            index: number(0, "index")?,
            guid: fields[1].to_string(),
            name: fields[2].to_string(),
            device_path: fields[3].to_string(),
            buttons: number(4, "button count")?,
            hats: number(5, "hat count")?,
            axes: number(6, "axis count")?,
        })
    }
}

/// Mapping string for `SDL_GAMECONTROLLERCONFIG`, one line per pad.
pub fn sdl_game_controller_config(controllers: &[Controller]) -> String {
    controllers
        .iter()
        .map(|c| format!("{},{},platform:Linux,", c.guid, c.name))
        .collect::<Vec<_>>()
        .join("\n")
}
