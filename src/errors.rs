/*
  Copyright 2017 Takashi Ogura

  Licensed under the Apache License, Version 2.0 (the "License");
  you may not use this file except in compliance with the License.
  You may obtain a copy of the License at

      http://www.apache.org/licenses/LICENSE-2.0

  Unless required by applicable law or agreed to in writing, software
  distributed under the License is distributed on an "AS IS" BASIS,
  WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
  See the License for the specific language governing permissions and
  limitations under the License.
*/
use thiserror::Error;

/// The reason of the failure of building a robot or moving its state
#[derive(Debug, Clone, Error)]
#[non_exhaustive]
pub enum Error {
    #[error("size mismatch input = {input}, required = {required}")]
    SizeMismatchError { input: usize, required: usize },
    #[error("body index {index} does not exist")]
    InvalidBodyError { index: usize },
    #[error("joint index {index} does not exist")]
    InvalidJointError { index: usize },
    #[error("the root body cannot be the child of a joint")]
    RootAsChildError,
    #[error("body {body} already has a parent joint")]
    AlreadyAttachedError { body: String },
    #[error("joint from {parent} to {child} closes a cycle")]
    CycleError { parent: String, child: String },
    #[error("body {body} is not connected to the root")]
    DetachedBodyError { body: String },
    #[error("rotation axis must not be zero")]
    InvalidAxisError,
    #[error("forward direction must be perpendicular to the up direction")]
    InvalidFrameError,
    #[error("failed to solve the normal equations: {message}")]
    InverseMatrixError { message: String },
}

pub type Result<T, E = Error> = ::std::result::Result<T, E>;
