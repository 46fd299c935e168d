pub mod media_reconciler;

pub use media_reconciler::MediaReconciler;
