//! Raw encodings of transactions and receipts as committed by the block's
//! transactions and receipts tries.

use alloy_consensus::transaction::from_eip155_value;
use alloy_consensus::{Eip658Value, Receipt, ReceiptWithBloom, Signed, TxEnvelope, TxLegacy};
use alloy_primitives::{Bloom, Bytes, Log, PrimitiveSignature, TxKind};
use alloy_rlp::Header;

use crate::error::{ProofError, ProofResult};
use crate::types::{Transaction, TransactionReceipt};

/// RLP-encode a transaction index, the key of both block tries.
pub fn rlp_index(index: u64) -> Bytes {
    alloy_rlp::encode(index).into()
}

/// Reproduce the bytes that were signed and broadcast for a legacy transaction:
/// `RLP([nonce, gasPrice, gas, to, value, input, v, r, s])`.
///
/// `v` is split back into the signature parity and the EIP-155 chain id, so
/// both pre-EIP-155 (27/28) and replay-protected signatures re-encode as sent.
pub fn tx_bytes(tx: &Transaction) -> ProofResult<Bytes> {
    if let Some(ty) = tx.transaction_type.filter(|ty| *ty != 0) {
        return Err(ProofError::UnsupportedTransactionType(ty));
    }
    let (y_parity, chain_id) =
        from_eip155_value(tx.v as u128).ok_or(ProofError::InvalidSignature {
            hash: tx.hash,
            v: tx.v,
        })?;
    let gas_price =
        u128::try_from(tx.gas_price).map_err(|_| ProofError::GasPriceOverflow(tx.hash))?;

    let legacy = TxLegacy {
        chain_id,
        nonce: tx.nonce,
        gas_price,
        gas_limit: tx.gas,
        to: tx.to.map_or(TxKind::Create, TxKind::Call),
        value: tx.value,
        input: tx.input.clone(),
    };
    let signature = PrimitiveSignature::new(tx.r, tx.s, y_parity);
    let envelope = TxEnvelope::Legacy(Signed::new_unchecked(legacy, signature, tx.hash));

    Ok(alloy_rlp::encode(&envelope).into())
}

/// Encode a receipt as `RLP([status, cumulativeGasUsed, logsBloom, logs])`.
///
/// A successful status encodes as `0x01`, a failed one as the empty string. When
/// the status is absent the post-state root takes its place.
pub fn receipt_bytes(receipt: &TransactionReceipt) -> ProofResult<Bytes> {
    let status = match (receipt.status, receipt.root) {
        (Some(success), _) => Eip658Value::Eip658(success),
        (None, Some(root)) => Eip658Value::PostState(root),
        (None, None) => {
            return Err(ProofError::MissingReceiptStatus(receipt.transaction_hash));
        }
    };
    let logs_bloom =
        Bloom::try_from(receipt.logs_bloom.as_ref()).map_err(|_| ProofError::InvalidLogsBloom {
            hash: receipt.transaction_hash,
            len: receipt.logs_bloom.len(),
        })?;
    let logs = receipt
        .logs
        .iter()
        .map(|log| Log::new_unchecked(log.address, log.topics.clone(), log.data.clone()))
        .collect();

    let consensus = ReceiptWithBloom::new(
        Receipt {
            status,
            cumulative_gas_used: receipt.cumulative_gas_used,
            logs,
        },
        logs_bloom,
    );
    Ok(alloy_rlp::encode(&consensus).into())
}

/// Prefix an already-encoded list payload with its list header.
pub(crate) fn wrap_list(payload: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(payload.len() + 9);
    Header {
        list: true,
        payload_length: payload.len(),
    }
    .encode(&mut out);
    out.extend_from_slice(payload);
    out
}

/// RLP list whose items are already-encoded RLP values, emitted verbatim.
pub(crate) fn encode_raw_list<T: AsRef<[u8]>>(items: &[T]) -> Vec<u8> {
    let payload: Vec<u8> = items
        .iter()
        .flat_map(|item| item.as_ref().iter().copied())
        .collect();
    wrap_list(&payload)
}
