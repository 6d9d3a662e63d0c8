//! VLAN bitmap codec helpers.
//!
//! Pure local commands for inspecting the wire encoding; no device
//! connection involved.

use ponctl_core::codec;

use crate::cli::{GlobalOpts, VlanArgs, VlanCommand};
use crate::error::CliError;
use crate::output;

pub fn handle(args: VlanArgs, global: &GlobalOpts) -> Result<(), CliError> {
    match args.command {
        VlanCommand::Encode { ids } => {
            let vlans = codec::parse_vlan_list(&ids.join(" "))
                .map_err(ponctl_core::CoreError::from)?;
            let encoded = codec::encode_vlan_set(&vlans)
                .map_err(ponctl_core::CoreError::from)?;
            output::print_output(&encoded, global.quiet);
            Ok(())
        }

        VlanCommand::Decode { bitmap } => {
            let vlans =
                codec::decode_vlan_set(&bitmap).map_err(ponctl_core::CoreError::from)?;
            let rendered = vlans
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join(" ");
            output::print_output(&rendered, global.quiet);
            Ok(())
        }
    }
}
