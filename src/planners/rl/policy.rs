//! Q-value network using Burn framework

use burn::module::Module;
use burn::nn::{Linear, LinearConfig, Relu};
use burn::prelude::*;

use super::action_space::NUM_ACTIONS;
use super::encoder::{EncodedState, STATE_SIZE};

/// Configuration for the Q-network
#[derive(Debug, Config)]
pub struct QNetworkConfig {
    /// Encoded state features
    pub input_size: usize,
    /// Width of the single hidden layer
    pub hidden_size: usize,
    /// One output per boss skill
    pub num_actions: usize,
}

impl Default for QNetworkConfig {
    fn default() -> Self {
        Self {
            input_size: STATE_SIZE,
            hidden_size: 64,
            num_actions: NUM_ACTIONS,
        }
    }
}

/// Maps an encoded state to one value per action: input → hidden (ReLU) → output
#[derive(Module, Debug)]
pub struct QNetwork<B: Backend> {
    /// Hidden layer
    hidden: Linear<B>,
    /// Output layer (one value per action)
    output: Linear<B>,
    /// Activation function
    activation: Relu,
}

impl<B: Backend> QNetwork<B> {
    pub fn new(device: &B::Device, config: &QNetworkConfig) -> Self {
        Self {
            hidden: LinearConfig::new(config.input_size, config.hidden_size).init(device),
            output: LinearConfig::new(config.hidden_size, config.num_actions).init(device),
            activation: Relu::new(),
        }
    }

    /// Forward pass: [batch, STATE_SIZE] → [batch, NUM_ACTIONS]
    pub fn forward(&self, states: Tensor<B, 2>) -> Tensor<B, 2> {
        let x = self.activation.forward(self.hidden.forward(states));
        self.output.forward(x)
    }

    /// Values of every action for a single state
    pub fn q_values(&self, state: &EncodedState, device: &B::Device) -> Vec<f32> {
        let input = states_to_tensor::<B>(std::slice::from_ref(state), device);
        self.forward(input).into_data().to_vec::<f32>().unwrap_or_default()
    }
}

/// Stack encoded states into a [batch, STATE_SIZE] tensor
pub fn states_to_tensor<B: Backend>(states: &[EncodedState], device: &B::Device) -> Tensor<B, 2> {
    let flat: Vec<f32> = states.iter().flat_map(|s| s.features()).collect();
    Tensor::<B, 1>::from_floats(flat.as_slice(), device).reshape([states.len(), STATE_SIZE])
}

#[cfg(test)]
mod tests {
    use burn::backend::NdArray;

    use super::*;

    type TestBackend = NdArray;

    #[test]
    fn test_q_network_config_default() {
        let config = QNetworkConfig::default();
        assert_eq!(config.input_size, 9);
        assert_eq!(config.hidden_size, 64);
        assert_eq!(config.num_actions, 5);
    }

    #[test]
    fn test_forward_shape() {
        let device = Default::default();
        let model = QNetwork::<TestBackend>::new(&device, &QNetworkConfig::default());

        let states = [EncodedState::default(), EncodedState::default()];
        let output = model.forward(states_to_tensor::<TestBackend>(&states, &device));
        assert_eq!(output.dims(), [2, NUM_ACTIONS]);

        let single = model.q_values(&EncodedState::default(), &device);
        assert_eq!(single.len(), NUM_ACTIONS);
    }
}
