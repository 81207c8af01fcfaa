// Domain model: identity, power, guest IP, and stateless host resources.

pub mod ip;
pub mod power;
pub mod supporting;
pub mod vm;

pub use self::ip::{IpFailure, IpResolution};
pub use self::power::{DisplayPowerState, PowerOperation, PowerState, TransientPowerState};
pub use self::supporting::{HostNetwork, NicAttachment, PortForwardRule, SharedFolderEntry};
pub use self::vm::{Vm, VmDetail, VmId};
