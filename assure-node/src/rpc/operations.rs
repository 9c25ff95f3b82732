//! Signed protocol operation RPC methods.
//!
//! Each mutating protocol call has its own method taking one parameter:
//! the hex-encoded bincode of a `SignedOperation`. The envelope's operation
//! must match the method name.

use std::sync::Arc;

use jsonrpsee::types::ErrorObjectOwned;
use jsonrpsee::RpcModule;

use assure_core::serialization::deserialize;
use assure_core::{OperationKind, SignedOperation};

use super::types::ReceiptInfo;
use super::{invalid_params, state_error, RpcState};

/// Methods accepting a signed operation, one per operation kind.
pub const SIGNED_METHODS: [OperationKind; 8] = [
    OperationKind::CreatePool,
    OperationKind::StakeFunds,
    OperationKind::WithdrawStake,
    OperationKind::DepositFunds,
    OperationKind::WithdrawDeposit,
    OperationKind::WithdrawInterest,
    OperationKind::WithdrawClaim,
    OperationKind::CheckPolicy,
];

/// Decode a hex-encoded signed operation.
pub fn decode_signed(text: &str) -> Result<SignedOperation, ErrorObjectOwned> {
    let text = text.strip_prefix("0x").unwrap_or(text);
    let bytes = hex::decode(text).map_err(|e| invalid_params(format!("invalid hex: {e}")))?;
    deserialize(&bytes).map_err(|e| invalid_params(format!("invalid signed operation: {e}")))
}

/// Register signed operation RPC methods.
pub fn register_methods(module: &mut RpcModule<Arc<RpcState>>) -> anyhow::Result<()> {
    for kind in SIGNED_METHODS {
        module.register_async_method(kind.name(), move |params, state, _| async move {
            let signed_hex: String = params.one()?;
            let signed = decode_signed(&signed_hex)?;

            if signed.op.kind() != kind {
                return Err(invalid_params(format!(
                    "method {} cannot apply a {} operation",
                    kind,
                    signed.op.kind()
                )));
            }

            let mut protocol = state.protocol.write().await;
            let receipt = protocol.apply_signed(&signed).map_err(state_error)?;

            Ok::<_, ErrorObjectOwned>(ReceiptInfo::from(&receipt))
        })?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use assure_core::serialization::serialize;
    use assure_core::{KeyPair, Operation};

    #[test]
    fn test_decode_signed() {
        let keypair = KeyPair::from_seed("rpc");
        let signed =
            SignedOperation::create(Operation::CheckPolicy { pool_id: 4 }, 0, &keypair).unwrap();
        let encoded = hex::encode(serialize(&signed).unwrap());

        assert_eq!(decode_signed(&encoded).unwrap(), signed);
        assert_eq!(decode_signed(&format!("0x{encoded}")).unwrap(), signed);
        assert!(decode_signed("zz").is_err());
        assert!(decode_signed("00").is_err());
    }

    #[test]
    fn test_every_operation_has_a_method() {
        let names: Vec<&str> = SIGNED_METHODS.iter().map(|k| k.name()).collect();
        assert_eq!(names.len(), 8);
        assert!(names.contains(&"withdraw_claim"));
    }
}
